//! Conversion of raw UPS variables into gauge observations.

use crate::metrics::data::{Labels, Observation};
use crate::metrics::registry::{self, BEEPER_STATUS, CHARGER_STATUS};
use crate::nut::VariableSet;
use std::collections::HashMap;

/// Value exported when a status variable holds an unrecognized string.
pub const UNKNOWN_STATUS: f64 = -1.0;

const BEEPER_STATES: &[(&str, f64)] = &[("enabled", 0.0), ("disabled", 1.0), ("muted", 2.0)];

const CHARGER_STATES: &[(&str, f64)] = &[
    ("charging", 0.0),
    ("discharging", 1.0),
    ("floating", 2.0),
    ("resting", 3.0),
];

fn lookup(table: &[(&str, f64)], value: &str) -> f64 {
    table
        .iter()
        .find(|(state, _)| *state == value)
        .map_or(UNKNOWN_STATUS, |(_, code)| *code)
}

/// Numeric code of a `ups.beeper.status` value.
pub fn beeper_status_code(value: &str) -> f64 {
    lookup(BEEPER_STATES, value)
}

/// Numeric code of a `battery.charger.status` value.
pub fn charger_status_code(value: &str) -> f64 {
    lookup(CHARGER_STATES, value)
}

/// Translate the variables of one UPS into one observation per registered
/// metric.
///
/// Registered variables the UPS does not report are emitted as `0` so the set
/// of series stays the same across polls and UPS models. Values that are not
/// numbers leave the metric at `0`; unregistered variables are ignored.
pub fn translate(vars: &VariableSet) -> Vec<Observation> {
    let descriptors = registry::descriptors();
    let mut values: HashMap<&'static str, f64> =
        descriptors.iter().map(|d| (d.variable, 0.0)).collect();
    let mut labels = Labels::default();

    for (key, value) in vars {
        match key.as_str() {
            "device.model" => labels.model = value.clone(),
            "device.mfr" => labels.mfr = value.clone(),
            "device.serial" => labels.serial = value.clone(),
            "device.type" => labels.device_type = value.clone(),
            other => {
                let Some(descriptor) = registry::descriptor(other) else {
                    continue;
                };
                let parsed = match descriptor.variable {
                    BEEPER_STATUS => Some(beeper_status_code(value)),
                    CHARGER_STATUS => Some(charger_status_code(value)),
                    _ => value.parse::<f64>().ok(),
                };
                if let Some(parsed) = parsed {
                    values.insert(descriptor.variable, parsed);
                }
            }
        }
    }

    descriptors
        .iter()
        .map(|descriptor| Observation {
            descriptor,
            value: values.get(descriptor.variable).copied().unwrap_or_default(),
            labels: labels.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> VariableSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn value_of(observations: &[Observation], variable: &str) -> f64 {
        observations
            .iter()
            .find(|o| o.descriptor.variable == variable)
            .map(|o| o.value)
            .unwrap()
    }

    #[test]
    fn test_absent_variables_are_zero() {
        let observations = translate(&VariableSet::new());
        assert_eq!(observations.len(), registry::descriptors().len());
        assert!(observations.iter().all(|o| o.value == 0.0));
        assert!(observations.iter().all(|o| o.labels == Labels::default()));
    }

    #[test]
    fn test_numeric_values() {
        let observations = translate(&vars(&[
            ("battery.charge", "87.5"),
            ("input.voltage", "231.0"),
            ("ups.load", "12"),
            ("battery.runtime", "1800"),
        ]));
        assert_eq!(value_of(&observations, "battery.charge"), 87.5);
        assert_eq!(value_of(&observations, "input.voltage"), 231.0);
        assert_eq!(value_of(&observations, "ups.load"), 12.0);
        assert_eq!(value_of(&observations, "battery.runtime"), 1800.0);
        assert_eq!(value_of(&observations, "output.voltage"), 0.0);
    }

    #[test]
    fn test_every_registered_variable_is_read() {
        for desc in registry::descriptors() {
            if desc.variable == BEEPER_STATUS || desc.variable == CHARGER_STATUS {
                continue;
            }
            let observations = translate(&vars(&[(desc.variable, "1.5")]));
            assert_eq!(value_of(&observations, desc.variable), 1.5, "{}", desc.variable);
        }
    }

    #[test]
    fn test_unparseable_value_keeps_default() {
        let observations = translate(&vars(&[
            ("battery.temperature", "N/A"),
            ("battery.charge", "100"),
        ]));
        assert_eq!(value_of(&observations, "battery.temperature"), 0.0);
        assert_eq!(value_of(&observations, "battery.charge"), 100.0);
    }

    #[test]
    fn test_unregistered_variables_ignored() {
        let observations = translate(&vars(&[("ups.status", "OL CHRG"), ("driver.name", "usbhid-ups")]));
        assert_eq!(observations.len(), registry::descriptors().len());
        assert!(observations.iter().all(|o| o.value == 0.0));
    }

    #[test]
    fn test_labels_captured() {
        let observations = translate(&vars(&[
            ("device.model", "Back-UPS ES 700G"),
            ("device.mfr", "American Power Conversion"),
            ("device.type", "ups"),
        ]));
        let labels = &observations[0].labels;
        assert_eq!(labels.model, "Back-UPS ES 700G");
        assert_eq!(labels.mfr, "American Power Conversion");
        assert_eq!(labels.serial, "");
        assert_eq!(labels.device_type, "ups");
        assert!(observations.iter().all(|o| &o.labels == labels));
    }

    #[test]
    fn test_beeper_status() {
        for (state, code) in [
            ("enabled", 0.0),
            ("disabled", 1.0),
            ("muted", 2.0),
            ("beeping", UNKNOWN_STATUS),
            ("", UNKNOWN_STATUS),
        ] {
            let observations = translate(&vars(&[(BEEPER_STATUS, state)]));
            assert_eq!(value_of(&observations, BEEPER_STATUS), code, "beeper {state:?}");
        }
        assert!(UNKNOWN_STATUS < 0.0);
    }

    #[test]
    fn test_charger_status() {
        assert_eq!(charger_status_code("charging"), 0.0);
        assert_eq!(charger_status_code("discharging"), 1.0);
        assert_eq!(charger_status_code("floating"), 2.0);
        assert_eq!(charger_status_code("Charging"), UNKNOWN_STATUS);

        let observations = translate(&vars(&[(CHARGER_STATUS, "resting")]));
        assert_eq!(value_of(&observations, CHARGER_STATUS), 3.0);
    }

    #[test]
    fn test_observations_follow_registry_order() {
        let observations = translate(&VariableSet::new());
        let names: Vec<_> = observations.iter().map(|o| o.name()).collect();
        let expected: Vec<_> = registry::descriptors().iter().map(|d| d.name).collect();
        assert_eq!(names, expected);
    }
}
