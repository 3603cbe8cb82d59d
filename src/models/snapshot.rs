//! Views over the cached device snapshot.
//!
//! The vendor document is kept verbatim; accessors read the first device.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// Indicator shown on the dashboard.
    pub fn indicator(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "🟢",
            DeviceStatus::Offline => "🔴",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "online"),
            DeviceStatus::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ObdData {
    pub fuel_litres: Option<f64>,
    pub fuel_percent: Option<i64>,
    pub mileage: Option<i64>,
    pub ts: Option<i64>,
    pub dist_to_empty: Option<i64>,
    pub fuel_ts: Option<i64>,
    pub mileage_ts: Option<i64>,
    pub fuel_reserve_ts: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CommonData {
    pub gps_lvl: Option<i64>,
    pub gsm_lvl: Option<i64>,
    /// Cabin temperature.
    pub ctemp: Option<i64>,
    /// Engine temperature.
    pub etemp: Option<i64>,
    pub mayak_temp: Option<f64>,
    pub ts: Option<i64>,
    pub reg_date: Option<i64>,
    pub heater_liquid_temp: Option<f64>,
    pub heater_air_temp: Option<f64>,
    pub motohours_reset_ts: Option<i64>,
    pub battery: Option<f64>,
    pub battery_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BalanceData {
    pub key: Option<String>,
    pub value: Option<i64>,
    pub state: Option<i64>,
    pub operator: Option<String>,
    pub currency: Option<String>,
    pub url_payment: Option<String>,
    pub number: Option<String>,
    pub slot: Option<i64>,
    pub ts: Option<i64>,
}

/// The vendor's last-known device state. An empty object when nothing has
/// been cached yet.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot(Value);

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self(Value::Object(Default::default()))
    }
}

impl DeviceSnapshot {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    pub fn status(&self) -> DeviceStatus {
        match self.0.get("codestring").and_then(Value::as_str) {
            Some("OK") => DeviceStatus::Online,
            _ => DeviceStatus::Offline,
        }
    }

    pub fn first_device(&self) -> Option<&Value> {
        self.0
            .get("user_data")?
            .get("devices")?
            .as_array()?
            .first()
    }

    pub fn mileage(&self) -> Option<i64> {
        self.first_device()?.get("obd")?.get("mileage")?.as_i64()
    }

    pub fn activity_ts(&self) -> Option<i64> {
        self.first_device()?.get("activity_ts")?.as_i64()
    }

    /// Last activity as local time, `dd.mm.yyyy HH:MM:SS`.
    pub fn update_timestamp(&self) -> Option<String> {
        let ts = self.activity_ts().filter(|ts| *ts != 0)?;
        let local = Local.timestamp_opt(ts, 0).single()?;
        Some(local.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn obd(&self) -> Option<ObdData> {
        typed(self.first_device()?.get("obd")?)
    }

    pub fn common(&self) -> Option<CommonData> {
        typed(self.first_device()?.get("common")?)
    }

    pub fn balance(&self) -> Vec<BalanceData> {
        self.first_device()
            .and_then(|d| d.get("balance"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(typed).collect())
            .unwrap_or_default()
    }
}

fn typed<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("snapshot field does not match expected shape: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DeviceSnapshot {
        DeviceSnapshot::new(json!({
            "codestring": "OK",
            "user_data": {"devices": [{"activity_ts": 1700000000, "obd": {"mileage": 12345}}]}
        }))
    }

    #[test]
    fn test_sample_snapshot_accessors() {
        let snap = sample();
        assert_eq!(snap.status(), DeviceStatus::Online);
        assert_eq!(snap.status().to_string(), "online");
        assert_eq!(snap.mileage(), Some(12345));

        let expected = Local
            .timestamp_opt(1700000000, 0)
            .unwrap()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(snap.update_timestamp(), Some(expected));
    }

    #[test]
    fn test_empty_snapshot_defaults() {
        let snap = DeviceSnapshot::default();
        assert_eq!(snap.status(), DeviceStatus::Offline);
        assert_eq!(snap.mileage(), None);
        assert_eq!(snap.update_timestamp(), None);
        assert!(snap.obd().is_none());
        assert!(snap.balance().is_empty());
    }

    #[test]
    fn test_non_ok_codestring_is_offline() {
        let snap = DeviceSnapshot::new(json!({"codestring": "ERROR"}));
        assert_eq!(snap.status(), DeviceStatus::Offline);
        assert_eq!(snap.status().indicator(), "🔴");
    }

    #[test]
    fn test_typed_device_views() {
        let snap = DeviceSnapshot::new(json!({
            "user_data": {"devices": [{
                "obd": {"mileage": 100, "fuel_litres": 31.5, "fuel_percent": 60, "unknown": true},
                "common": {"battery": 12.6, "etemp": 85, "battery_type": "lead"},
                "balance": [
                    {"key": "active", "value": 150, "currency": "RUB", "operator": "MTS"},
                    "garbage"
                ]
            }]}
        }));

        let obd = snap.obd().unwrap();
        assert_eq!(obd.fuel_litres, Some(31.5));
        assert_eq!(obd.fuel_percent, Some(60));
        assert_eq!(obd.ts, None);

        let common = snap.common().unwrap();
        assert_eq!(common.battery, Some(12.6));
        assert_eq!(common.etemp, Some(85));

        let balance = snap.balance();
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].value, Some(150));
    }
}
