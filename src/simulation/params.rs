use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::gating::PhenotypeRates;
use super::gating::regulation::RegulationMode;
use super::geometric_utils::Region;

/// Simulation parameters that control the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Seed for the simulation RNG. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// Navigation grid geometry.
    pub grid: GridParams,
    /// Area in which fish are spawned at the start of a run.
    pub spawn_area: Region,
    /// Spawning grounds the fish are trying to reach.
    pub goal: GoalParams,
    /// Per-fish movement and energy settings.
    pub fish: FishParams,
    /// Population size, breeding and wave settings.
    pub school: SchoolParams,
    /// Dam crossing rates.
    pub dam: DamParams,
    /// Fishing tower settings.
    pub fishing_tower: FishingTowerParams,
    /// Regulation tower settings.
    pub regulation_tower: RegulationTowerParams,
    /// Speed multipliers.
    pub time: TimeParams,
    /// Locations where a dam may be built.
    pub dam_sites: Vec<DamSiteParams>,
    /// Locations where a tower may be built.
    pub tower_pads: Vec<Region>,
    /// Stop in a summary phase between run and placement.
    pub show_summary: bool,
    /// Number of entries kept in the event log.
    pub event_log_size: usize,
}

/// Geometry of the navigation grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridParams {
    /// Number of cells along x.
    pub width: usize,
    /// Number of cells along y.
    pub height: usize,
    /// World length of one cell side.
    pub cell_size: f32,
    /// World position of the grid's (0, 0) corner.
    pub origin: [f32; 2],
    /// Clamp edited vectors so they never reach beyond their own cell.
    pub limit_vectors_to_cell: bool,
}

/// Goal region and its capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalParams {
    /// Region fish must reach to count as successful.
    pub region: Region,
    /// Nesting sites per sex. `None` accepts every arriving fish.
    pub nesting_sites: Option<usize>,
}

/// Movement and energy model for individual fish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishParams {
    /// Energy at spawn.
    pub starting_energy: f32,
    /// Energy spent per second while applying an impulse one cell length long.
    pub energy_usage_rate: f32,
    /// Hard speed cap.
    pub max_swim_speed: f32,
    /// Fraction of the remaining turn covered per second.
    pub rotate_speed: f32,
    /// Random perturbation size relative to the field vector.
    pub random_movement_multiplier: f32,
}

/// Population, reproduction and spawning waves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolParams {
    /// Size of the founding population on turn 1.
    pub initial_num_fish: usize,
    /// Minimum offspring per breeding pair.
    pub min_offspring: usize,
    /// Maximum offspring per breeding pair.
    pub max_offspring: usize,
    /// Fish released per wave.
    pub fish_per_wave: usize,
    /// Seconds between waves.
    pub time_between_waves: f32,
}

/// Dam crossing rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamParams {
    /// Crossing rate applied to every size class on a bare dam.
    pub default_crossing_rate: f32,
    /// Rates that replace the dam's table once a ladder is attached.
    pub ladder_rates: PhenotypeRates,
}

/// Fishing tower settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishingTowerParams {
    /// Radius within which fish can be targeted.
    pub effect_radius: f32,
    /// Seconds between firings; also the length of each catch attempt.
    pub time_per_apply_effect: f32,
    /// Flash cycles shown during a successful catch.
    pub num_flashes_per_catch: u32,
    /// Probability of catching a targeted fish, per size class.
    pub catch_rates: PhenotypeRates,
}

/// Regulation tower settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationTowerParams {
    /// Radius within which fishing towers can be targeted.
    pub effect_radius: f32,
    /// Seconds between firings; also the length of each attempt.
    pub time_per_apply_effect: f32,
    /// Flash cycles shown during a successful regulation.
    pub num_flashes_per_catch: u32,
    /// Probability that an attempt succeeds.
    pub success_rate: f32,
    /// What a successful regulation does to the target.
    pub mode: RegulationMode,
    /// Multipliers applied to a slowed tower's catch rates.
    pub slowdown_factors: PhenotypeRates,
    /// Seconds a slowdown lasts.
    pub slowdown_duration: f32,
}

/// Speed multipliers for the faster time states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeParams {
    /// Time scale for the "faster" speed.
    pub faster_scale: f32,
    /// Time scale for the "fastest" speed.
    pub fastest_scale: f32,
}

/// A location where a dam can be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamSiteParams {
    /// Area that must be under the cursor to select this site.
    pub area: Region,
    /// Zone in which fish contact the dam once it is built.
    pub contact_zone: Region,
    /// Zone upstream of the dam where passing fish are dropped off.
    pub drop_off: Region,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: None,
            grid: GridParams {
                width: 20,
                height: 40,
                cell_size: 1.0,
                origin: [0.0, 0.0],
                limit_vectors_to_cell: false,
            },
            spawn_area: Region::new([6.0, 1.0], [14.0, 4.0]),
            goal: GoalParams {
                region: Region::new([0.0, 36.0], [20.0, 40.0]),
                nesting_sites: None,
            },
            fish: FishParams {
                starting_energy: 100.0,
                energy_usage_rate: 1.0,
                max_swim_speed: 3.0,
                rotate_speed: 5.0,
                random_movement_multiplier: 0.5,
            },
            school: SchoolParams {
                initial_num_fish: 40,
                min_offspring: 2,
                max_offspring: 4,
                fish_per_wave: 5,
                time_between_waves: 1.0,
            },
            dam: DamParams {
                default_crossing_rate: 0.5,
                ladder_rates: PhenotypeRates::new(0.9, 0.75, 0.6),
            },
            fishing_tower: FishingTowerParams {
                effect_radius: 5.0,
                time_per_apply_effect: 2.0,
                num_flashes_per_catch: 3,
                catch_rates: PhenotypeRates::new(0.3, 0.5, 0.7),
            },
            regulation_tower: RegulationTowerParams {
                effect_radius: 12.0,
                time_per_apply_effect: 3.0,
                num_flashes_per_catch: 3,
                success_rate: 0.5,
                mode: RegulationMode::Kill,
                slowdown_factors: PhenotypeRates::uniform(0.5),
                slowdown_duration: 3.0,
            },
            time: TimeParams {
                faster_scale: 2.0,
                fastest_scale: 4.0,
            },
            dam_sites: vec![DamSiteParams {
                area: Region::new([0.0, 19.0], [20.0, 21.0]),
                contact_zone: Region::new([0.0, 19.0], [20.0, 21.0]),
                drop_off: Region::new([2.0, 21.5], [18.0, 23.5]),
            }],
            tower_pads: vec![
                Region::new([0.5, 11.0], [2.5, 13.0]),
                Region::new([17.5, 11.0], [19.5, 13.0]),
                Region::new([0.5, 27.0], [2.5, 29.0]),
                Region::new([17.5, 27.0], [19.5, 29.0]),
            ],
            show_summary: true,
            event_log_size: 20,
        }
    }
}

impl Params {
    /// Checks value ranges that the simulation relies on.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: impl Into<String>) -> SimError {
            SimError::InvalidConfig(message.into())
        }

        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(invalid("grid must have at least one cell"));
        }
        if self.grid.cell_size <= 0.0 {
            return Err(invalid("grid cell size must be positive"));
        }
        if self.school.min_offspring > self.school.max_offspring {
            return Err(invalid(format!(
                "min_offspring ({}) exceeds max_offspring ({})",
                self.school.min_offspring, self.school.max_offspring
            )));
        }
        if self.school.fish_per_wave == 0 {
            return Err(invalid("fish_per_wave must be at least 1"));
        }
        if self.school.time_between_waves < 0.0 {
            return Err(invalid("time_between_waves must not be negative"));
        }
        if self.fish.max_swim_speed <= 0.0 {
            return Err(invalid("max_swim_speed must be positive"));
        }
        if self.fishing_tower.num_flashes_per_catch == 0
            || self.regulation_tower.num_flashes_per_catch == 0
        {
            return Err(invalid("num_flashes_per_catch must be at least 1"));
        }
        if self.fishing_tower.time_per_apply_effect <= 0.0
            || self.regulation_tower.time_per_apply_effect <= 0.0
        {
            return Err(invalid("time_per_apply_effect must be positive"));
        }

        let probabilities = [
            ("dam.default_crossing_rate", self.dam.default_crossing_rate),
            ("regulation_tower.success_rate", self.regulation_tower.success_rate),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        for (name, rates) in [
            ("dam.ladder_rates", &self.dam.ladder_rates),
            ("fishing_tower.catch_rates", &self.fishing_tower.catch_rates),
        ] {
            if !rates.is_probability() {
                return Err(invalid(format!("{name} must be within [0, 1]")));
            }
        }

        Ok(())
    }

    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
