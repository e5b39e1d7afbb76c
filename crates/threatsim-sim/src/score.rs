//! Running score state tracked by the engine.

use threatsim_core::constants::BASE_MAX_INTEGRITY;
use threatsim_core::state::ScoreView;

#[derive(Debug, Clone)]
pub struct ScoreState {
    pub points: u64,
    pub threats_neutralized: u32,
    pub threats_spawned: u32,
    pub impacts: u32,
    pub shots_fired: u32,
    pub drones_deployed: u32,
    pub base_integrity: f64,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            points: 0,
            threats_neutralized: 0,
            threats_spawned: 0,
            impacts: 0,
            shots_fired: 0,
            drones_deployed: 0,
            base_integrity: BASE_MAX_INTEGRITY,
        }
    }
}

impl ScoreState {
    pub fn view(&self, mission_time_secs: f64) -> ScoreView {
        ScoreView {
            points: self.points,
            threats_neutralized: self.threats_neutralized,
            threats_spawned: self.threats_spawned,
            impacts: self.impacts,
            shots_fired: self.shots_fired,
            drones_deployed: self.drones_deployed,
            base_integrity: self.base_integrity,
            mission_time_secs,
        }
    }
}
