use log::{info, trace, warn};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::{
    ast::{OrcidId, PutCode, Work, WorkType, NO_TITLE},
    Error,
};

use super::Client;

/// Base URL of the public registry API.
pub const PUBLIC_API_URL: &str = "https://pub.orcid.org/v3.0";

const ORCID_JSON: &str = "application/vnd.orcid+json";

const DOI_ID_TYPE: &str = "doi";

macro_rules! works_url {
    ($api: expr, $orcid: expr) => {
        format!("{}/{}/works", $api.trim_end_matches('/'), $orcid)
    };
}

macro_rules! work_url {
    ($api: expr, $orcid: expr, $put_code: expr) => {
        format!(
            "{}/{}/work/{}",
            $api.trim_end_matches('/'),
            $orcid,
            $put_code
        )
    };
}

/// Fetches the put-code of the first summary in every group of the works listing.
///
/// A failed request or a listing without groups yields no put-codes rather than an error.
pub(crate) fn get_put_codes<C: Client>(api: &str, orcid: &OrcidId) -> Vec<PutCode> {
    info!("Fetching works listing for ORCID iD '{orcid}'");
    let client = C::default();

    let listing: WorksListing = match client.get_json(&works_url!(api, orcid), ORCID_JSON) {
        Ok(listing) => listing,
        Err(e) => {
            warn!("Works listing could not be fetched, treating it as empty: {e}");
            return Vec::new();
        }
    };

    let put_codes = listing
        .group
        .into_iter()
        .enumerate()
        .filter_map(|(i, group)| {
            let put_code = group
                .work_summary
                .into_iter()
                .next()
                .and_then(|summary| serde_json::from_value::<WorkSummary>(summary).ok())
                .and_then(|summary| summary.put_code);
            if put_code.is_none() {
                warn!("Group {i} of the works listing has no usable put-code - skipping");
            }
            put_code
        })
        .collect::<Vec<_>>();

    trace!("Works listing contains {} put-codes", put_codes.len());
    put_codes
}

/// Fetches the full record for a single work.
pub(crate) fn get_work_record<C: Client>(
    api: &str,
    orcid: &OrcidId,
    put_code: &PutCode,
) -> Result<WorkRecord, Error> {
    trace!("Fetching work '{put_code}'");
    let client = C::default();
    client.get_json(&work_url!(api, orcid, put_code), ORCID_JSON)
}

/// Deserializes an optional value, treating anything that does not fit `T` as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes a list, dropping elements that do not fit `T`. A non-list is an empty list.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct WorksListing {
    #[serde(deserialize_with = "lenient_seq")]
    group: Vec<Group>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct Group {
    // kept raw so a malformed first summary is not replaced by the next one
    #[serde(rename = "work-summary", deserialize_with = "lenient_seq")]
    work_summary: Vec<serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct WorkSummary {
    #[serde(rename = "put-code", deserialize_with = "lenient")]
    put_code: Option<PutCode>,
}

/// A work as the registry returns it. Every nested container is optional and a container of
/// the wrong shape is read as absent.
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
pub(crate) struct WorkRecord {
    #[serde(deserialize_with = "lenient")]
    title: Option<TitleContainer>,
    #[serde(rename = "publication-date", deserialize_with = "lenient")]
    publication_date: Option<PublicationDate>,
    #[serde(rename = "journal-title", deserialize_with = "lenient")]
    journal_title: Option<ValueField>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    contributors: Option<Contributors>,
    #[serde(rename = "external-ids", deserialize_with = "lenient")]
    external_ids: Option<ExternalIds>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct ValueField {
    #[serde(deserialize_with = "lenient")]
    value: Option<String>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct TitleContainer {
    #[serde(deserialize_with = "lenient")]
    title: Option<ValueField>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct PublicationDate {
    #[serde(deserialize_with = "lenient")]
    year: Option<ValueField>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct Contributors {
    #[serde(deserialize_with = "lenient_seq")]
    contributor: Vec<Contributor>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct Contributor {
    #[serde(rename = "credit-name", deserialize_with = "lenient")]
    credit_name: Option<ValueField>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct ExternalIds {
    #[serde(rename = "external-id", deserialize_with = "lenient_seq")]
    external_id: Vec<ExternalId>,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct ExternalId {
    #[serde(rename = "external-id-type", deserialize_with = "lenient")]
    id_type: Option<String>,
    #[serde(rename = "external-id-value", deserialize_with = "lenient")]
    id_value: Option<String>,
}

#[inline]
fn into_value(container: Option<ValueField>) -> Option<String> {
    container.and_then(|v| v.value)
}

impl WorkRecord {
    /// Applies every field fallback and produces the normalized [`Work`].
    pub(crate) fn build(self, put_code: PutCode) -> Work {
        // Deconstruct to take ownership of the nested values (avoids cloning).
        let Self {
            title,
            publication_date,
            journal_title,
            kind,
            contributors,
            external_ids,
        } = self;

        let title = into_value(title.and_then(|t| t.title)).unwrap_or_else(|| NO_TITLE.to_owned());
        let year = into_value(publication_date.and_then(|d| d.year)).unwrap_or_default();
        let journal = into_value(journal_title).unwrap_or_default();
        let kind = kind.map_or_else(WorkType::default, |k| WorkType::from_registry_type(&k));

        let authors = contributors
            .map(|c| c.contributor)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| into_value(c.credit_name))
            .filter(|name| !name.is_empty())
            .collect();

        // only the first DOI typed identifier counts, even when it carries no value
        let doi = external_ids
            .map(|ids| ids.external_id)
            .unwrap_or_default()
            .into_iter()
            .find(|id| id.id_type.as_deref() == Some(DOI_ID_TYPE))
            .and_then(|id| id.id_value)
            .unwrap_or_default();

        Work {
            put_code,
            kind,
            authors,
            title,
            journal,
            year,
            doi,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::{assert_url, impl_text_producer, MockClient, NetworkErrorProducer},
        ast::{OrcidId, PutCode, Work, WorkType},
        ErrorKind,
    };

    use super::{WorkRecord, PUBLIC_API_URL};

    const WORKS_JSON: &str = include_str!("../../../../tests/data/orcid_works.json");
    const WORK_JSON: &str = include_str!("../../../../tests/data/orcid_work.json");

    fn orcid() -> OrcidId {
        "0000-0002-1825-0097".parse().unwrap()
    }

    fn build(json: &str, put_code: u64) -> Work {
        serde_json::from_str::<WorkRecord>(json)
            .expect("lenient records never fail on an object")
            .build(PutCode::from(put_code))
    }

    impl_text_producer! {
        ListingProducer => |url| Ok(WORKS_JSON.to_owned()),
        WorkProducer => |url| Ok(WORK_JSON.to_owned()),
        NoGroupProducer => |url| Ok("{\"last-modified-date\": null}".to_owned()),
        NullGroupProducer => |url| Ok("{\"group\": null}".to_owned()),
        NotJsonProducer => |url| Ok("<html>502</html>".to_owned()),
        MalformedFirstSummaryProducer => |url| Ok(r#"{
            "group": [
                {"work-summary": [null, {"put-code": 5}]},
                {"work-summary": [{"put-code": 21}, null]}
            ]
        }"#.to_owned()),
        BrokenGroupProducer => |url| Ok(r#"{
            "group": [
                {"work-summary": []},
                {"work-summary": [{"put-code": 11}, {"put-code": 12}]},
                {"work-summary": [{"put-code": null}]},
                {"work-summary": [null, {"put-code": 14}]},
                {"work-summary": ["flat", {"put-code": 15}]},
                "not a group",
                {"work-summary": [{"put-code": "13"}]}
            ]
        }"#.to_owned()),
    }

    #[test]
    fn works_url_format_is_correct() {
        super::get_put_codes::<MockClient>(PUBLIC_API_URL, &orcid());
        assert_url!("https://pub.orcid.org/v3.0/0000-0002-1825-0097/works");
    }

    #[test]
    fn work_url_format_is_correct_and_trims_trailing_slash() {
        let res = super::get_work_record::<MockClient<NetworkErrorProducer>>(
            "https://api.sandbox.orcid.org/v3.0/",
            &orcid(),
            &PutCode::from(42),
        );

        assert_eq!(ErrorKind::IO, res.unwrap_err().kind());
        assert_url!("https://api.sandbox.orcid.org/v3.0/0000-0002-1825-0097/work/42");
    }

    #[test]
    fn listing_yields_first_put_code_of_each_group_in_order() {
        let codes = super::get_put_codes::<MockClient<ListingProducer>>(PUBLIC_API_URL, &orcid());

        assert_eq!(
            vec![PutCode::from(1_234_567), PutCode::from(2_345_678), PutCode::from(3_456_789)],
            codes
        );
    }

    #[test]
    fn listing_failures_degrade_to_empty() {
        let api = PUBLIC_API_URL;
        assert!(super::get_put_codes::<MockClient<NetworkErrorProducer>>(api, &orcid()).is_empty());
        assert!(super::get_put_codes::<MockClient<NotJsonProducer>>(api, &orcid()).is_empty());
        assert!(super::get_put_codes::<MockClient<NoGroupProducer>>(api, &orcid()).is_empty());
        assert!(super::get_put_codes::<MockClient<NullGroupProducer>>(api, &orcid()).is_empty());
    }

    #[test]
    fn listing_skips_groups_without_put_code() {
        let codes =
            super::get_put_codes::<MockClient<BrokenGroupProducer>>(PUBLIC_API_URL, &orcid());

        assert_eq!(vec![PutCode::from(11), PutCode::new("13")], codes);
    }

    #[test]
    fn full_record_is_normalized() {
        let record = super::get_work_record::<MockClient<WorkProducer>>(
            PUBLIC_API_URL,
            &orcid(),
            &PutCode::from(1_234_567),
        )
        .unwrap();
        let work = record.build(PutCode::from(1_234_567));

        assert_eq!(WorkType::JournalArticle, work.kind);
        assert_eq!("Graph Algorithms in Practice", work.title);
        assert_eq!("Journal of Computer Science", work.journal);
        assert_eq!("2020", work.year);
        assert_eq!("10.1000/xyz123", work.doi);
        assert_eq!(vec!["A. Smith", "B. Jones"], work.authors);
    }

    #[test]
    fn empty_record_uses_every_fallback() {
        assert_eq!(Work::new(PutCode::from(7)), build("{}", 7));
    }

    #[test]
    fn null_containers_use_fallbacks() {
        let json = r#"{
            "title": null,
            "publication-date": null,
            "journal-title": null,
            "type": null,
            "contributors": null,
            "external-ids": null
        }"#;

        assert_eq!(Work::new(PutCode::from(7)), build(json, 7));
    }

    #[test]
    fn malformed_nesting_uses_fallbacks() {
        let json = r#"{
            "title": {"title": "flat string instead of object"},
            "publication-date": {"year": "2020"},
            "journal-title": {"value": 12},
            "type": 3,
            "contributors": {"contributor": {"credit-name": {"value": "not a list"}}},
            "external-ids": {"external-id": "doi"}
        }"#;

        assert_eq!(Work::new(PutCode::from(7)), build(json, 7));
    }

    #[test]
    fn missing_title_value_uses_placeholder() {
        let work = build(r#"{"title": {"title": {}}}"#, 1);
        assert_eq!("No Title", work.title);

        let work = build(r#"{"title": {"title": {"value": null}}}"#, 1);
        assert_eq!("No Title", work.title);
    }

    #[test]
    fn year_requires_structured_value() {
        assert_eq!("", build(r#"{"publication-date": {}}"#, 1).year);
        assert_eq!("", build(r#"{"publication-date": {"year": null}}"#, 1).year);
        assert_eq!("", build(r#"{"publication-date": {"year": {}}}"#, 1).year);
        assert_eq!(
            "1999",
            build(r#"{"publication-date": {"year": {"value": "1999"}, "month": null}}"#, 1).year
        );
    }

    #[test]
    fn type_is_matched_case_insensitively() {
        assert_eq!(WorkType::BookChapter, build(r#"{"type": "BOOK-CHAPTER"}"#, 1).kind);
        assert_eq!(WorkType::Generic, build(r#"{"type": "preprint"}"#, 1).kind);
    }

    #[test]
    fn contributors_without_credit_name_are_omitted() {
        let json = r#"{
            "contributors": {"contributor": [
                {"credit-name": {"value": "First"}},
                {"credit-name": null},
                {"contributor-orcid": {"path": "0000-0001-5109-3700"}},
                {"credit-name": {"value": ""}},
                {"credit-name": "Flat Name"},
                {"credit-name": {"value": null}},
                42,
                {"credit-name": {"value": "Last"}}
            ]}
        }"#;

        assert_eq!(vec!["First", "Last"], build(json, 1).authors);
    }

    #[test]
    fn first_doi_is_used() {
        let json = r#"{
            "external-ids": {"external-id": [
                {"external-id-type": "isbn", "external-id-value": "978-0"},
                {"external-id-type": "doi", "external-id-value": "10.1/first"},
                {"external-id-type": "doi", "external-id-value": "10.1/second"}
            ]}
        }"#;

        assert_eq!("10.1/first", build(json, 1).doi);
    }

    #[test]
    fn doi_type_must_match_exactly() {
        let json = r#"{
            "external-ids": {"external-id": [
                {"external-id-type": "DOI", "external-id-value": "10.1/upper"},
                {"external-id-type": "eid", "external-id-value": "2-s2.0-1"}
            ]}
        }"#;

        assert_eq!("", build(json, 1).doi);
        assert_eq!("", build(r#"{"external-ids": {"external-id": []}}"#, 1).doi);
    }

    #[test]
    fn first_doi_without_value_yields_no_doi() {
        let json = r#"{
            "external-ids": {"external-id": [
                {"external-id-type": "doi"},
                {"external-id-type": "doi", "external-id-value": "10.1/second"}
            ]}
        }"#;

        assert_eq!("", build(json, 1).doi);
    }

    #[test]
    fn only_the_first_summary_of_a_group_is_consulted() {
        let codes = super::get_put_codes::<MockClient<MalformedFirstSummaryProducer>>(
            PUBLIC_API_URL,
            &orcid(),
        );

        assert_eq!(vec![PutCode::from(21)], codes);
    }
}
