use std::io::Write;

use k6forge::model::Executor;
use k6forge::profile::{ConfigOverrides, ProfileLoader, ScenarioTemplate};
use k6forge::{Script, Step, compile, validate_config};
use tempfile::NamedTempFile;

#[test]
fn test_profile_file_drives_compilation() {
    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    temp_file
        .write_all(
            br#"
[profiles.soak]
executor = "per-vu-iterations"
vus = 4
iterations = 25
maxDuration = 120
userAgent = ""

[profiles.soak.tags]
suite = "nightly"
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let file = ProfileLoader::load_from_path(temp_file.path()).unwrap();
    let config =
        ProfileLoader::resolve(Some(&file), Some("soak"), &ConfigOverrides::default()).unwrap();
    assert!(validate_config(&config).is_empty());

    let script = Script::new(vec![Step::new("GET", "https://x/y")]);
    let document = compile(&script, &config).unwrap();
    assert!(document.contains("\"executor\": \"per-vu-iterations\""));
    assert!(document.contains("\"iterations\": 25"));
    assert!(document.contains("\"maxDuration\": \"120s\""));
    assert!(document.contains("\"suite\": \"nightly\""));
    assert!(!document.contains("userAgent"));
}

#[test]
fn test_overrides_win_over_profile() {
    let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
    temp_file
        .write_all(br#"{"executor": "ramping-vus", "stages": [{"duration": 10, "target": 5}]}"#)
        .unwrap();
    temp_file.flush().unwrap();

    let mut config = ProfileLoader::load_configuration(temp_file.path()).unwrap();
    ConfigOverrides {
        vus: Some(3),
        duration: Some(15),
        executor: Some(Executor::ConstantVus),
    }
    .apply(&mut config);

    assert_eq!(config.executor, Executor::ConstantVus);
    assert_eq!(config.vus, 3);
    assert_eq!(config.duration, 15);
}

#[test]
fn test_every_template_is_valid() {
    for template in ScenarioTemplate::ALL {
        let config = template.configuration();
        assert!(
            validate_config(&config).is_empty(),
            "template {} has problems",
            template
        );
    }
}
