use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::{events, registrations, students};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    events::{
        entities::{Event, EventStatus, Registration, RegistrationStatus},
        requests::{EventListParams, EventUpdate, NewEvent},
        responses::{EventListResponse, RegistrationView},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_event_impl(&self, req: NewEvent) -> Result<Event> {
        let model = events::ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            deadline: Set(req.deadline.timestamp()),
            form_link: Set(req.form_link),
            status: Set(EventStatus::Upcoming.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建活动失败", e))?;

        Ok(result.into_event())
    }

    pub async fn get_event_by_id_impl(&self, event_id: i64) -> Result<Option<Event>> {
        let result = events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询活动失败", e))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// 按创建时间倒序分页
    pub async fn list_events_with_pagination_impl(
        &self,
        query: EventListParams,
    ) -> Result<EventListResponse> {
        let (page, size) = query.pagination.normalized();

        let paginator = events::Entity::find()
            .order_by_desc(events::Column::CreatedAt)
            .order_by_desc(events::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询活动总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询活动列表失败", e))?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_event()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_upcoming_events_impl(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Event>> {
        let result = events::Entity::find()
            .filter(events::Column::Deadline.gt(now.timestamp()))
            .filter(events::Column::Status.eq(EventStatus::Upcoming.as_str()))
            .order_by_asc(events::Column::Deadline)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询即将开始的活动失败", e))?;

        Ok(result.into_iter().map(|m| m.into_event()).collect())
    }

    /// 部分更新，仅写入提供的字段
    pub async fn update_event_impl(
        &self,
        event_id: i64,
        update: EventUpdate,
    ) -> Result<Option<Event>> {
        let Some(existing) = events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询活动失败", e))?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(deadline) = update.deadline {
            active.deadline = Set(deadline.timestamp());
        }
        if let Some(form_link) = update.form_link {
            active.form_link = Set(form_link);
        }
        if let Some(status) = update.status {
            active.status = Set(status.to_string());
        }

        if !active.is_changed() {
            return self.get_event_by_id_impl(event_id).await;
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新活动失败", e))?;

        Ok(Some(updated.into_event()))
    }

    /// 删除活动及其全部报名
    pub async fn delete_event_impl(&self, event_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        registrations::Entity::delete_many()
            .filter(registrations::Column::EventId.eq(event_id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除活动报名失败", e))?;

        let result = events::Entity::delete_by_id(event_id)
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除活动失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_registration_impl(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<Option<Registration>> {
        let result = registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .filter(registrations::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询报名失败", e))?;

        Ok(result.map(|m| m.into_registration()))
    }

    pub async fn create_registration_impl(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<Registration> {
        let model = registrations::ActiveModel {
            event_id: Set(event_id),
            student_id: Set(student_id),
            status: Set(RegistrationStatus::Registered.to_string()),
            registered_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建报名失败", e))?;

        Ok(result.into_registration())
    }

    /// 重新报名时同时刷新报名时间
    pub async fn set_registration_status_impl(
        &self,
        registration_id: i64,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>> {
        let Some(existing) = registrations::Entity::find_by_id(registration_id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询报名失败", e))?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.status = Set(status.to_string());
        if status == RegistrationStatus::Registered {
            active.registered_at = Set(chrono::Utc::now().timestamp());
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新报名状态失败", e))?;

        Ok(Some(updated.into_registration()))
    }

    /// 活动的报名列表（含已取消），按报名时间倒序
    pub async fn list_registrations_by_event_impl(
        &self,
        event_id: i64,
    ) -> Result<Vec<RegistrationView>> {
        let regs = registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .order_by_desc(registrations::Column::RegisteredAt)
            .order_by_desc(registrations::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询活动报名失败", e))?;

        if regs.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = regs.iter().map(|r| r.student_id).collect();
        let student_map: HashMap<i64, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询报名学生失败", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(regs
            .into_iter()
            .map(|m| {
                let student = student_map.get(&m.student_id);
                RegistrationView {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    student_email: student.map(|s| s.email.clone()).unwrap_or_default(),
                    roll_number: student.map(|s| s.roll_number.clone()).unwrap_or_default(),
                    department: student.map(|s| s.department.clone()).unwrap_or_default(),
                    registration: m.into_registration(),
                }
            })
            .collect())
    }

    pub async fn list_registered_event_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        registrations::Entity::find()
            .select_only()
            .column(registrations::Column::EventId)
            .filter(registrations::Column::StudentId.eq(student_id))
            .filter(registrations::Column::Status.eq(RegistrationStatus::Registered.as_str()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询学生报名失败", e))
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_storage;
    use crate::models::events::{
        entities::{EventStatus, RegistrationStatus},
        requests::{EventUpdate, NewEvent},
    };
    use crate::models::users::requests::NewStudent;

    fn new_event(title: &str, days: i64) -> NewEvent {
        NewEvent {
            title: title.into(),
            description: "Annual fest".into(),
            deadline: chrono::Utc::now() + chrono::Duration::days(days),
            form_link: "https://forms.example.com/fest".into(),
        }
    }

    #[tokio::test]
    async fn test_upcoming_excludes_past_and_closed() {
        let storage = memory_storage().await;
        let later = storage.create_event_impl(new_event("Later", 10)).await.unwrap();
        let sooner = storage.create_event_impl(new_event("Sooner", 2)).await.unwrap();
        storage.create_event_impl(new_event("Past", -1)).await.unwrap();
        let closed = storage.create_event_impl(new_event("Closed", 5)).await.unwrap();
        storage
            .update_event_impl(
                closed.id,
                EventUpdate {
                    status: Some(EventStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let upcoming = storage
            .list_upcoming_events_impl(chrono::Utc::now())
            .await
            .unwrap();
        let ids: Vec<i64> = upcoming.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
    }

    #[tokio::test]
    async fn test_delete_event_cascades_registrations() {
        let storage = memory_storage().await;
        let event = storage.create_event_impl(new_event("Hack Night", 3)).await.unwrap();
        let student = storage
            .create_student_impl(NewStudent {
                name: "Kavya Nair".into(),
                email: "kavya.nair@campusflow.in".into(),
                password_hash: "hash".into(),
                roll_number: "ME014".into(),
                department: "ME".into(),
                class_id: None,
                year: None,
            })
            .await
            .unwrap();

        let reg = storage
            .create_registration_impl(event.id, student.id)
            .await
            .unwrap();
        assert!(
            storage
                .create_registration_impl(event.id, student.id)
                .await
                .unwrap_err()
                .is_conflict()
        );
        assert_eq!(
            storage.list_registered_event_ids_impl(student.id).await.unwrap(),
            vec![event.id]
        );

        let cancelled = storage
            .set_registration_status_impl(reg.id, RegistrationStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
        assert!(
            storage
                .list_registered_event_ids_impl(student.id)
                .await
                .unwrap()
                .is_empty()
        );

        let views = storage.list_registrations_by_event_impl(event.id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].roll_number, "ME014");

        assert!(storage.delete_event_impl(event.id).await.unwrap());
        assert!(
            storage
                .get_registration_impl(event.id, student.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
