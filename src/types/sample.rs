use serde::{Deserialize, Serialize};

/// 单次上报的运动传感器样本（加速度 + 角速度）
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sample {
    pub device_id: String,
    pub time_ms: i64,
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
}

impl Sample {
    pub fn new(device_id: impl Into<String>, time_ms: i64, accel: [f64; 3], gyro: [f64; 3]) -> Self {
        Self {
            device_id: device_id.into(),
            time_ms,
            ax: accel[0],
            ay: accel[1],
            az: accel[2],
            gx: gyro[0],
            gy: gyro[1],
            gz: gyro[2],
        }
    }

    pub fn reading(&self) -> MotionReading {
        MotionReading {
            ax: self.ax,
            ay: self.ay,
            az: self.az,
            gx: self.gx,
            gy: self.gy,
            gz: self.gz,
        }
    }
}

/// The six raw readings of the last sample ingested for a device.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MotionReading {
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
}
