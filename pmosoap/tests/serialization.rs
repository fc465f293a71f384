use chrono::{FixedOffset, NaiveDate};
use pmosoap::deserialize::node_to_value;
use pmosoap::{SoapParameters, SoapValue, TypeMap};
use std::io::BufReader;
use xmltree::Element;

fn parse_fragment(tag: &str, xml: &str) -> Element {
    let wrapped = format!("<{tag}>{xml}</{tag}>");
    Element::parse(BufReader::new(wrapped.as_bytes())).unwrap()
}

#[test]
fn primitives_read_back_as_strings() {
    let params = SoapParameters::new()
        .add("Name", "Fish & <Chips>")
        .add("Count", 12)
        .add("Ratio", 0.25)
        .add("Enabled", false)
        .add("Code", "007");

    let xml = params.to_xml().unwrap();
    let types: TypeMap = params
        .iter()
        .map(|(name, _)| (name.to_string(), "s:string".to_string()))
        .collect();
    let value = node_to_value(&parse_fragment("Call", &xml), &types);

    assert_eq!(value.get("Name"), Some(&SoapValue::from("Fish & <Chips>")));
    assert_eq!(value.get("Count"), Some(&SoapValue::from("12")));
    assert_eq!(value.get("Ratio"), Some(&SoapValue::from("0.25")));
    assert_eq!(value.get("Enabled"), Some(&SoapValue::from("false")));
    assert_eq!(value.get("Code"), Some(&SoapValue::from("007")));
}

#[test]
fn typed_values_read_back_with_their_declared_types() {
    let birthday = NaiveDate::from_ymd_opt(2014, 8, 18)
        .unwrap()
        .and_hms_milli_opt(9, 5, 3, 7)
        .unwrap()
        .and_local_timezone(FixedOffset::west_opt(5 * 3600).unwrap())
        .unwrap();

    let params = SoapParameters::new()
        .add("Id", 9_000_000_000i64)
        .add("Active", true)
        .add("When", birthday)
        .add("Scores", vec![1, 2, 3]);

    let xml = params.to_xml().unwrap();
    assert!(xml.contains("<When>2014-08-18T09:05:03.007-05:00</When>"));
    assert!(xml.contains("<Scores><int>1</int><int>2</int><int>3</int></Scores>"));

    let types: TypeMap = [
        ("Id", "s:long"),
        ("Active", "s:boolean"),
        ("When", "s:dateTime"),
        ("Scores", "tns:ArrayOfInt"),
        ("int", "s:int"),
    ]
    .into_iter()
    .collect();
    let value = node_to_value(&parse_fragment("Call", &xml), &types);

    assert_eq!(value.get("Id"), Some(&SoapValue::Int(9_000_000_000)));
    assert_eq!(value.get("Active"), Some(&SoapValue::Bool(true)));
    assert_eq!(value.get("When"), Some(&SoapValue::DateTime(birthday)));
    assert_eq!(value.get("Scores"), Some(&SoapValue::from(vec![1, 2, 3])));
}
