//! Physics-parameter record and the SVJProductions filename conventions.
//!
//! A `Physics` value fully specifies one s-channel signal scenario plus the
//! bookkeeping fields (year, part, event counts) that the naming convention
//! and the `cmsRun` driver need. Filenames are pure functions of the record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_year() -> i32 {
    2018
}

fn default_mediator_mass() -> f64 {
    150.0
}

fn default_invisible_fraction() -> f64 {
    0.3
}

fn default_dark_meson_mass() -> f64 {
    20.0
}

fn default_dark_alpha() -> String {
    "peak".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    #[serde(default = "default_year")]
    pub year: i32,

    /// Z' mediator mass in GeV.
    #[serde(default = "default_mediator_mass")]
    pub mediator_mass: f64,

    /// Fraction of dark hadrons that stay invisible (rinv).
    #[serde(default = "default_invisible_fraction")]
    pub invisible_fraction: f64,

    /// Minimum boost requirement in GeV; 0 means unboosted.
    #[serde(default)]
    pub boost: f64,

    /// Variable the boost cut is applied to ("genjetpt" or "madpt").
    /// Unset is treated as "genjetpt" when boost > 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_variable: Option<String>,

    /// Dark meson mass in GeV.
    #[serde(default = "default_dark_meson_mass")]
    pub dark_meson_mass: f64,

    /// Running of the dark coupling ("peak", "low", "high").
    #[serde(default = "default_dark_alpha")]
    pub dark_alpha: String,

    /// Event limit for the cmsRun job; also encoded in the output filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_events: Option<i64>,

    /// Disambiguates multiple output files of one logical job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,

    /// Event count the gridpack was generated with; gridpack naming falls
    /// back to 10000 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_events_in: Option<i64>,

    /// Generator-level jet pt floor, forwarded to the driver when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_genjet_pt: Option<f64>,

    /// Forward-compatible extra parameters; ignored by the naming convention.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            year: default_year(),
            mediator_mass: default_mediator_mass(),
            invisible_fraction: default_invisible_fraction(),
            boost: 0.0,
            boost_variable: None,
            dark_meson_mass: default_dark_meson_mass(),
            dark_alpha: default_dark_alpha(),
            max_events: None,
            part: None,
            max_events_in: None,
            min_genjet_pt: None,
            extra: HashMap::new(),
        }
    }
}

impl Physics {
    /// Decimal rendering of rinv; integral values keep one decimal place
    /// ("1.0", not "1"), matching what the SVJProductions driver writes.
    pub fn invisible_fraction_str(&self) -> String {
        if self.invisible_fraction.fract() == 0.0 {
            format!("{:.1}", self.invisible_fraction)
        } else {
            format!("{}", self.invisible_fraction)
        }
    }

    /// Filename fragment encoding the boost cut, empty when unboosted.
    pub fn boost_str(&self) -> Result<String> {
        if self.boost == 0.0 {
            return Ok(String::new());
        }
        let variable = self.boost_variable.as_deref().unwrap_or("genjetpt");
        let tag = match variable {
            "genjetpt" => "PT",
            "madpt" => "MADPT",
            other => {
                return Err(Error::Config(format!(
                    "Unknown boost variable '{}' (expected genjetpt or madpt)",
                    other
                )))
            }
        };
        Ok(format!("_{}{:.0}", tag, self.boost))
    }

    /// Filename fragment encoding the event limit, empty when unlimited.
    pub fn max_events_str(&self) -> String {
        match self.max_events {
            Some(n) => format!("_n-{}", n),
            None => String::new(),
        }
    }

    /// Basename of the rootfile the way SVJProductions formats it for these
    /// parameters and the given step tag.
    pub fn filename(&self, step: &str) -> Result<String> {
        self.filename_with_ext(step, ".root")
    }

    pub fn filename_with_ext(&self, step: &str, ext: &str) -> Result<String> {
        let mut outfile = format!(
            "{step}_s-channel_mMed-{mediator_mass:.0}_mDark-{dark_meson_mass:.0}\
             _rinv-{invisible_fraction}_alpha-{dark_alpha}{boost_str}\
             _13TeV-madgraphMLM-pythia8{max_events_str}",
            step = step,
            mediator_mass = self.mediator_mass,
            dark_meson_mass = self.dark_meson_mass,
            invisible_fraction = self.invisible_fraction_str(),
            dark_alpha = self.dark_alpha,
            boost_str = self.boost_str()?,
            max_events_str = self.max_events_str(),
        );
        if let Some(part) = self.part.filter(|&p| p != 0) {
            outfile.push_str(&format!("_part-{}", part));
        }
        outfile.push_str(ext);
        Ok(outfile)
    }

    /// Basename of the madgraph gridpack tarball.
    ///
    /// Later SVJProductions revisions dropped rinv and alpha from this
    /// artifact's name, and the event-count suffix is always present
    /// (10000 when no explicit count was requested).
    pub fn gridpack_filename(&self) -> Result<String> {
        Ok(format!(
            "step0_GRIDPACK_s-channel_mMed-{mediator_mass:.0}_mDark-{dark_meson_mass:.0}\
             {boost_str}_13TeV-madgraphMLM-pythia8_n-{max_events_in}.tar.xz",
            mediator_mass = self.mediator_mass,
            dark_meson_mass = self.dark_meson_mass,
            boost_str = self.boost_str()?,
            max_events_in = self.max_events_in.unwrap_or(10000),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Physics {
        Physics {
            year: 2018,
            mediator_mass: 250.0,
            dark_meson_mass: 10.0,
            invisible_fraction: 0.3,
            boost: 0.0,
            max_events: Some(5),
            part: Some(1),
            ..Physics::default()
        }
    }

    #[test]
    fn filename_matches_convention() {
        assert_eq!(
            record().filename("step_SIM").unwrap(),
            "step_SIM_s-channel_mMed-250_mDark-10_rinv-0.3_alpha-peak\
             _13TeV-madgraphMLM-pythia8_n-5_part-1.root"
        );
    }

    #[test]
    fn filename_is_deterministic() {
        let physics = record();
        assert_eq!(
            physics.filename("step_LHE-GEN").unwrap(),
            physics.filename("step_LHE-GEN").unwrap()
        );
    }

    #[test]
    fn filename_without_part_or_limit() {
        let physics = Physics::default();
        assert_eq!(
            physics.filename("step_SIM").unwrap(),
            "step_SIM_s-channel_mMed-150_mDark-20_rinv-0.3_alpha-peak\
             _13TeV-madgraphMLM-pythia8.root"
        );
    }

    #[test]
    fn filename_keeps_decimal_for_integral_rinv() {
        let fully_invisible = Physics {
            invisible_fraction: 1.0,
            ..Physics::default()
        };
        assert_eq!(
            fully_invisible.filename("step_SIM").unwrap(),
            "step_SIM_s-channel_mMed-150_mDark-20_rinv-1.0_alpha-peak\
             _13TeV-madgraphMLM-pythia8.root"
        );
        let fully_visible = Physics {
            invisible_fraction: 0.0,
            ..Physics::default()
        };
        assert!(fully_visible
            .filename("step_SIM")
            .unwrap()
            .contains("rinv-0.0"));
    }

    #[test]
    fn filename_places_boost_fragment_before_tune() {
        let physics = Physics {
            mediator_mass: 350.0,
            boost: 300.0,
            ..Physics::default()
        };
        assert_eq!(
            physics.filename("step_SIM").unwrap(),
            "step_SIM_s-channel_mMed-350_mDark-20_rinv-0.3_alpha-peak_PT300\
             _13TeV-madgraphMLM-pythia8.root"
        );
    }

    #[test]
    fn gridpack_filename_defaults_event_count() {
        assert_eq!(
            record().gridpack_filename().unwrap(),
            "step0_GRIDPACK_s-channel_mMed-250_mDark-10_13TeV-madgraphMLM-pythia8_n-10000.tar.xz"
        );
    }

    #[test]
    fn gridpack_filename_with_explicit_event_count() {
        let physics = Physics {
            max_events_in: Some(5000),
            ..record()
        };
        assert_eq!(
            physics.gridpack_filename().unwrap(),
            "step0_GRIDPACK_s-channel_mMed-250_mDark-10_13TeV-madgraphMLM-pythia8_n-5000.tar.xz"
        );
    }

    #[test]
    fn boost_str_empty_when_unboosted() {
        assert_eq!(Physics::default().boost_str().unwrap(), "");
    }

    #[test]
    fn boost_str_defaults_to_genjetpt() {
        let physics = Physics {
            boost: 300.0,
            ..Physics::default()
        };
        assert_eq!(physics.boost_str().unwrap(), "_PT300");
    }

    #[test]
    fn boost_str_madpt() {
        let physics = Physics {
            boost: 400.0,
            boost_variable: Some("madpt".to_string()),
            ..Physics::default()
        };
        assert_eq!(physics.boost_str().unwrap(), "_MADPT400");
    }

    #[test]
    fn boost_str_rejects_unknown_variable() {
        let physics = Physics {
            boost: 300.0,
            boost_variable: Some("ht".to_string()),
            ..Physics::default()
        };
        let err = physics.boost_str().unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn max_events_str_verbatim() {
        assert_eq!(Physics::default().max_events_str(), "");
        let physics = Physics {
            max_events: Some(5),
            ..Physics::default()
        };
        assert_eq!(physics.max_events_str(), "_n-5");
    }

    #[test]
    fn deserializes_with_defaults_and_extra_keys() {
        let physics: Physics = serde_json::from_str(
            r#"{"mediator_mass": 350, "spectator": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(physics.mediator_mass, 350.0);
        assert_eq!(physics.dark_alpha, "peak");
        assert!(physics.extra.contains_key("spectator"));
        // Unrecognized keys never leak into filenames
        assert!(!physics.filename("step_SIM").unwrap().contains("spectator"));
    }
}
