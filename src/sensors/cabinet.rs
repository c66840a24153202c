//! Simulated fridge cabinet.
//!
//! Boards without a climate sensor run the environmental loop against this
//! first-order thermal model.  Each sample moves the cabinet toward ambient
//! by a fixed fraction of the gap and, while the peltier runs, pulls it down
//! by a fixed step.  Humidity relaxes toward ambient and drops while the
//! cold plate condenses moisture out of the air.

use crate::app::ports::{ClimatePort, ClimateReading};

#[derive(Debug, Clone, PartialEq)]
pub struct CabinetModel {
    pub ambient_c: f32,
    pub ambient_humidity_pct: f32,
    /// Fraction of the ambient gap closed per sample (0..1).
    pub leak: f32,
    /// Temperature removed per sample while cooling (°C).
    pub pull_down_c: f32,
    /// Humidity removed per sample while cooling (%).
    pub condense_pct: f32,
}

impl Default for CabinetModel {
    fn default() -> Self {
        Self {
            ambient_c: 22.0,
            ambient_humidity_pct: 55.0,
            leak: 0.02,
            pull_down_c: 0.6,
            condense_pct: 0.5,
        }
    }
}

pub struct SimulatedCabinet {
    model: CabinetModel,
    temperature_c: f32,
    humidity_pct: f32,
    cooling: bool,
    fan: bool,
}

impl SimulatedCabinet {
    /// Cabinet starting at ambient.
    pub fn new(model: CabinetModel) -> Self {
        let (t, rh) = (model.ambient_c, model.ambient_humidity_pct);
        Self::with_state(model, t, rh)
    }

    pub fn with_state(model: CabinetModel, temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            model,
            temperature_c,
            humidity_pct,
            cooling: false,
            fan: false,
        }
    }

    /// Advance the model by one sample period and return the new reading.
    pub fn sample(&mut self) -> ClimateReading {
        let m = &self.model;
        self.temperature_c += (m.ambient_c - self.temperature_c) * m.leak;
        self.humidity_pct += (m.ambient_humidity_pct - self.humidity_pct) * m.leak;
        if self.cooling {
            self.temperature_c -= m.pull_down_c;
            self.humidity_pct -= m.condense_pct;
        }
        self.humidity_pct = self.humidity_pct.clamp(0.0, 100.0);
        self.reading()
    }

    pub fn reading(&self) -> ClimateReading {
        ClimateReading {
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
        }
    }

    pub fn cooling(&self) -> bool {
        self.cooling
    }

    pub fn fan(&self) -> bool {
        self.fan
    }
}

impl ClimatePort for SimulatedCabinet {
    fn read_climate(&mut self) -> Option<ClimateReading> {
        Some(self.sample())
    }

    fn set_cooling(&mut self, on: bool) {
        self.cooling = on;
    }

    fn set_fan(&mut self, on: bool) {
        self.fan = on;
    }
}
