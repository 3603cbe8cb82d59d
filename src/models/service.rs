use serde::Serialize;

/// A maintenance interval with the distance left until it is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub description: String,
    pub latest_action_km: i64,
    pub range_km: i64,
    /// Negative once the service is overdue.
    pub remain_km: i64,
}

impl ServiceStatus {
    /// `None` when the hand-edited distances are too large to subtract.
    pub fn compute(
        description: String,
        latest_action_km: i64,
        range_km: i64,
        mileage: i64,
    ) -> Option<Self> {
        let driven = mileage.checked_sub(latest_action_km)?;
        Some(Self {
            remain_km: range_km.checked_sub(driven)?,
            description,
            latest_action_km,
            range_km,
        })
    }

    pub fn is_overdue(&self) -> bool {
        self.remain_km < 0
    }
}
