//! Property-based tests for the roundtrip guarantees of the wire format.
//!
//! Values are generated into untyped map beans, so every leaf also exercises
//! the `type` attribute and every container shape the `metatype` attribute.

use beanxml::{from_str, to_string_with_options, BeanXmlOptions, Collection, MapBean, Value};
use proptest::prelude::*;

fn roundtrip(bean: &MapBean, options: &BeanXmlOptions) -> bool {
    match to_string_with_options(bean, options) {
        Ok(serialized) => match from_str(&serialized, options) {
            Ok(back) => match back.downcast::<MapBean>() {
                Ok(back) => back == *bean,
                Err(e) => {
                    eprintln!("Downcast failed: {}", e);
                    false
                }
            },
            Err(e) => {
                eprintln!("Read failed: {}", e);
                eprintln!("Document was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Write failed: {}", e);
            false
        }
    }
}

fn xml_char() -> impl Strategy<Value = char> {
    any::<char>().prop_filter("control characters are not representable", |c| {
        (*c as u32) >= 32 || matches!(c, '\t' | '\n' | '\r')
    })
}

fn xml_string() -> impl Strategy<Value = String> {
    prop::collection::vec(xml_char(), 0..24).prop_map(|chars| chars.into_iter().collect())
}

fn property_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,11}"
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        xml_string().prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        xml_char().prop_map(Value::Char),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        any::<f64>()
            .prop_filter("finite", |d| d.is_finite())
            .prop_map(Value::Double),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        let slot = prop_oneof![inner.clone(), Just(Value::Null)];
        prop_oneof![
            prop::collection::vec(slot.clone(), 0..4).prop_map(Value::list),
            prop::collection::vec(slot.clone(), 0..4)
                .prop_map(|values| Value::from(Collection::Array(values))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::set),
            prop::collection::vec((leaf(), 1u32..5), 0..4)
                .prop_map(|entries| Value::from(Collection::multiset_from(entries))),
            prop::collection::vec(prop::collection::vec(slot, 0..3), 0..3)
                .prop_map(|rows| Value::from(Collection::Table(rows))),
            prop::collection::vec((xml_string().prop_map(Value::String), inner.clone()), 0..4)
                .prop_map(Value::map),
            prop::collection::vec((property_name(), inner), 0..4).prop_map(|entries| {
                Value::from(entries.into_iter().collect::<MapBean>())
            }),
        ]
    })
}

fn bean() -> impl Strategy<Value = MapBean> {
    prop::collection::vec((property_name(), value()), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_text_survives_escaping(s in xml_string()) {
        let mut bean = MapBean::new();
        bean.insert("text", Value::String(s));
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::compact()));
    }

    #[test]
    fn prop_key_attribute_survives_escaping(key in xml_string(), n in any::<i32>()) {
        let mut bean = MapBean::new();
        bean.insert("map", Value::map(vec![(Value::String(key), Value::Int(n))]));
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::compact()));
    }

    #[test]
    fn prop_leaves_roundtrip(v in leaf()) {
        let mut bean = MapBean::new();
        bean.insert("v", v);
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::compact()));
    }

    #[test]
    fn prop_graphs_roundtrip_compact(bean in bean()) {
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::compact()));
    }

    #[test]
    fn prop_graphs_roundtrip_pretty(bean in bean()) {
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::pretty()));
    }

    #[test]
    fn prop_layout_does_not_change_content(bean in bean()) {
        let compact = to_string_with_options(&bean, &BeanXmlOptions::compact()).unwrap();
        let pretty = to_string_with_options(&bean, &BeanXmlOptions::pretty()).unwrap();
        let from_compact = from_str(&compact, &BeanXmlOptions::compact()).unwrap();
        let from_pretty = from_str(&pretty, &BeanXmlOptions::pretty()).unwrap();
        prop_assert_eq!(from_compact, from_pretty);
    }

    #[test]
    fn prop_null_positions_preserved(flags in prop::collection::vec(any::<bool>(), 0..10)) {
        let items: Vec<Value> = flags
            .iter()
            .enumerate()
            .map(|(i, present)| if *present { Value::Int(i as i32) } else { Value::Null })
            .collect();
        let mut bean = MapBean::new();
        bean.insert("items", Value::list(items));
        prop_assert!(roundtrip(&bean, &BeanXmlOptions::compact()));
    }
}
