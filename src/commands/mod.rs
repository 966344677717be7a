use clap::Args;

use svj_jobs::physics::Physics;
use svj_jobs::Result;

pub mod download;
pub mod filename;
pub mod run_step;
pub mod setup;
pub mod treemaker;

pub type CmdResult<T> = Result<T>;

/// Physics-parameter flags shared by every subcommand that takes a record.
/// `--json` supplies a full record; individual flags override on top.
#[derive(Args, Debug)]
pub struct PhysicsArgs {
    /// Full physics record as a JSON object (defaults fill missing fields)
    #[arg(long)]
    pub json: Option<String>,

    /// Production year
    #[arg(long)]
    pub year: Option<i32>,

    /// Z' mediator mass in GeV
    #[arg(long = "mmed")]
    pub mediator_mass: Option<f64>,

    /// Dark meson mass in GeV
    #[arg(long = "mdark")]
    pub dark_meson_mass: Option<f64>,

    /// Invisible fraction (rinv)
    #[arg(long = "rinv")]
    pub invisible_fraction: Option<f64>,

    /// Running of the dark coupling
    #[arg(long = "alpha")]
    pub dark_alpha: Option<String>,

    /// Boost cut in GeV
    #[arg(long)]
    pub boost: Option<f64>,

    /// Variable the boost cut applies to (genjetpt or madpt)
    #[arg(long = "boostvar")]
    pub boost_variable: Option<String>,

    /// Event limit for the job
    #[arg(long = "max-events")]
    pub max_events: Option<i64>,

    /// Event count encoded in the gridpack name
    #[arg(long = "max-events-in")]
    pub max_events_in: Option<i64>,

    /// Generator-level jet pt floor
    #[arg(long = "min-genjet-pt")]
    pub min_genjet_pt: Option<f64>,

    /// Part number for multi-part jobs
    #[arg(long)]
    pub part: Option<u32>,
}

impl PhysicsArgs {
    pub fn to_physics(&self) -> Result<Physics> {
        let mut physics = match self.json {
            Some(ref spec) => serde_json::from_str(spec)?,
            None => Physics::default(),
        };
        if let Some(year) = self.year {
            physics.year = year;
        }
        if let Some(mass) = self.mediator_mass {
            physics.mediator_mass = mass;
        }
        if let Some(mass) = self.dark_meson_mass {
            physics.dark_meson_mass = mass;
        }
        if let Some(rinv) = self.invisible_fraction {
            physics.invisible_fraction = rinv;
        }
        if let Some(ref alpha) = self.dark_alpha {
            physics.dark_alpha = alpha.clone();
        }
        if let Some(boost) = self.boost {
            physics.boost = boost;
        }
        if let Some(ref variable) = self.boost_variable {
            physics.boost_variable = Some(variable.clone());
        }
        if let Some(n) = self.max_events {
            physics.max_events = Some(n);
        }
        if let Some(n) = self.max_events_in {
            physics.max_events_in = Some(n);
        }
        if let Some(pt) = self.min_genjet_pt {
            physics.min_genjet_pt = Some(pt);
        }
        if let Some(part) = self.part {
            physics.part = Some(part);
        }
        Ok(physics)
    }
}

/// Expand `~` in user-supplied paths.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}
