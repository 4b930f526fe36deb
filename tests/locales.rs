use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_yaml::Value;

fn flatten(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = key.as_str().unwrap_or_else(|| panic!("non-string key under {prefix}"));
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(locale: &str) -> BTreeSet<String> {
    let path = format!("locales/{locale}.yml");
    let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
    let value: Value = serde_yaml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));
    let mut keys = BTreeSet::new();
    flatten("", &value, &mut keys);
    keys
}

fn collect_sources(dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(fs::read_to_string(&path).unwrap());
        }
    }
}

#[test]
fn locales_have_the_same_keys() {
    let en = locale_keys("en");
    let uk = locale_keys("uk");
    let missing_in_uk: Vec<_> = en.difference(&uk).collect();
    let missing_in_en: Vec<_> = uk.difference(&en).collect();
    assert!(missing_in_uk.is_empty(), "missing in uk.yml: {missing_in_uk:?}");
    assert!(missing_in_en.is_empty(), "missing in en.yml: {missing_in_en:?}");
}

#[test]
fn every_translation_call_has_a_key() {
    let en = locale_keys("en");
    let mut sources = Vec::new();
    collect_sources(Path::new("src"), &mut sources);

    let call = Regex::new(r#"\bt!\(\s*"([a-z_.\-]+)""#).unwrap();
    let used: BTreeSet<String> = sources
        .iter()
        .flat_map(|src| call.captures_iter(src).map(|c| c[1].to_string()))
        .collect();

    assert!(!used.is_empty());
    let unknown: Vec<_> = used.difference(&en).collect();
    assert!(unknown.is_empty(), "keys used but not defined: {unknown:?}");
}

#[test]
fn placeholders_match_across_locales() {
    let placeholder = Regex::new(r"%\{(\w+)\}").unwrap();
    let load = |locale: &str| -> Value {
        serde_yaml::from_str(&fs::read_to_string(format!("locales/{locale}.yml")).unwrap()).unwrap()
    };
    let en = load("en");
    let uk = load("uk");

    for key in locale_keys("en") {
        let lookup = |root: &Value| -> String {
            key.split('.')
                .try_fold(root, |node, part| node.get(part))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let names = |text: &str| -> BTreeSet<String> {
            placeholder
                .captures_iter(text)
                .map(|c| c[1].to_string())
                .collect()
        };
        assert_eq!(
            names(&lookup(&en)),
            names(&lookup(&uk)),
            "placeholders differ for {key}"
        );
    }
}
