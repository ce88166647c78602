use super::DataError;
use crate::domain::{CountyRecord, DisasterTag, ResourceId, ResourceRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

/// Reads county records, header names matching the `CountyRecord` fields.
pub fn read_counties<R: Read>(reader: R) -> Result<Vec<CountyRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut counties = Vec::new();

    for (index, record) in csv_reader.deserialize::<CountyRecord>().enumerate() {
        let county = record?;
        county.validate().map_err(|source| DataError::InvalidRecord {
            row: index + 1,
            id: county.id.0.clone(),
            source,
        })?;
        counties.push(county);
    }

    Ok(counties)
}

pub fn read_counties_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CountyRecord>, DataError> {
    let file = std::fs::File::open(path)?;
    read_counties(file)
}

/// Reads resource records; `disaster_tags` is a `;`-separated list.
pub fn read_resources<R: Read>(reader: R) -> Result<Vec<ResourceRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut resources = Vec::new();

    for (index, record) in csv_reader.deserialize::<ResourceRow>().enumerate() {
        let resource = record?.into_record();
        resource.validate().map_err(|source| DataError::InvalidRecord {
            row: index + 1,
            id: resource.id.0.clone(),
            source,
        })?;
        resources.push(resource);
    }

    Ok(resources)
}

pub fn read_resources_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ResourceRecord>, DataError> {
    let file = std::fs::File::open(path)?;
    read_resources(file)
}

#[derive(Debug, Deserialize)]
struct ResourceRow {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    unit: String,
    available_qty: u64,
    #[serde(default, deserialize_with = "split_tags")]
    disaster_tags: Vec<DisasterTag>,
}

impl ResourceRow {
    fn into_record(self) -> ResourceRecord {
        ResourceRecord {
            id: ResourceId(self.id),
            name: self.name,
            category: self.category,
            unit: self.unit,
            available_qty: self.available_qty,
            disaster_tags: self.disaster_tags,
        }
    }
}

fn split_tags<'de, D>(deserializer: D) -> Result<Vec<DisasterTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(parse_tag_list(&raw))
}

pub(crate) fn parse_tag_list(raw: &str) -> Vec<DisasterTag> {
    raw.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(DisasterTag::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AqiCategory, RecordError};
    use std::io::Cursor;

    const COUNTY_HEADER: &str = "id,name,ta_min,ta_avg,ta_max,aqi_category,risk_score,unemployment_pct,no_hsdp_pct,minority_pct,age65_pct,population,area_sq_mi,rolling_avg_ta_max\n";

    #[test]
    fn reads_counties_with_labelled_aqi() {
        let csv = format!(
            "{COUNTY_HEADER}7,Pima,61.0,80.2,101.3,Unhealthy for Sensitive Groups,81.0,6.1,12.0,48.0,19.9,1043433,9189.0,99.0\n"
        );
        let counties = read_counties(Cursor::new(csv)).expect("counties parse");
        assert_eq!(counties.len(), 1);
        assert_eq!(counties[0].name, "Pima");
        assert_eq!(
            counties[0].aqi_category,
            AqiCategory::UnhealthyForSensitiveGroups
        );
        assert_eq!(counties[0].population, 1_043_433);
    }

    #[test]
    fn rejects_county_with_zero_area_and_reports_row() {
        let csv = format!(
            "{COUNTY_HEADER}7,Pima,61.0,80.2,101.3,Good,81.0,6.1,12.0,48.0,19.9,1043433,9189.0,99.0\n8,Nowhere,61.0,80.2,101.3,Good,81.0,6.1,12.0,48.0,19.9,1000,0,99.0\n"
        );
        match read_counties(Cursor::new(csv)) {
            Err(DataError::InvalidRecord { row, id, source }) => {
                assert_eq!(row, 2);
                assert_eq!(id, "8");
                assert_eq!(source, RecordError::NonPositiveArea(0.0));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn negative_population_fails_to_parse() {
        let csv = format!(
            "{COUNTY_HEADER}9,Broken,61.0,80.2,101.3,Good,81.0,6.1,12.0,48.0,19.9,-5,10.0,99.0\n"
        );
        assert!(matches!(
            read_counties(Cursor::new(csv)),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn reads_resources_with_semicolon_tags() {
        let csv = "id,name,category,unit,available_qty,disaster_tags\nr1,Generators,Equipment,units,40,power_outage; extreme_heat\nr2,Sandbags,Relief,bags,900,\n";
        let resources = read_resources(Cursor::new(csv)).expect("resources parse");
        assert_eq!(
            resources[0].disaster_tags,
            vec![DisasterTag::PowerOutage, DisasterTag::ExtremeHeat]
        );
        assert!(resources[1].disaster_tags.is_empty());
        assert_eq!(resources[1].available_qty, 900);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        match read_resources_from_path("./does-not-exist.csv") {
            Err(DataError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
