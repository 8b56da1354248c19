use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 活动状态
    #[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
    pub enum EventStatus {
        Upcoming => "upcoming",
        Ongoing => "ongoing",
        Closed => "closed",
    }
}

crate::define_string_enum! {
    /// 报名状态
    #[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
    pub enum RegistrationStatus {
        Registered => "registered",
        Cancelled => "cancelled",
    }
}

// 活动
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub form_link: String,
    pub status: EventStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Event {
    /// 报名仅在截止时间之前开放
    pub fn accepts_registration_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now <= self.deadline
    }
}

// 活动报名
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub student_id: i64,
    pub status: RegistrationStatus,
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_registration_window() {
        let now = Utc::now();
        let event = Event {
            id: 1,
            title: "Tech Fest".into(),
            description: "Annual fest".into(),
            deadline: now,
            form_link: "https://forms.example/fest".into(),
            status: EventStatus::Upcoming,
            created_at: now - Duration::days(3),
        };
        assert!(event.accepts_registration_at(now - Duration::hours(1)));
        assert!(!event.accepts_registration_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(EventStatus::Upcoming.to_string(), "upcoming");
        assert_eq!("cancelled".parse::<RegistrationStatus>().unwrap(), RegistrationStatus::Cancelled);
        assert_eq!(serde_json::to_value(EventStatus::Closed).unwrap(), "closed");
    }
}
