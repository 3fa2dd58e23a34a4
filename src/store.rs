use crate::errors::AppError;
use crate::models::{Alarm, AlarmDraft, AlarmUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All alarms, plus the ones deleted but still restorable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmStore {
    #[serde(default)]
    alarms: Vec<Alarm>,
    #[serde(default)]
    deleted: Vec<Alarm>,
}

impl AlarmStore {
    pub fn list(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn deleted(&self) -> &[Alarm] {
        &self.deleted
    }

    pub fn get(&self, id: Uuid) -> Result<&Alarm, AppError> {
        self.alarms
            .iter()
            .find(|alarm| alarm.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn create(&mut self, draft: AlarmDraft) -> Result<Alarm, AppError> {
        self.create_at(draft, Utc::now())
    }

    pub fn create_at(&mut self, draft: AlarmDraft, now: DateTime<Utc>) -> Result<Alarm, AppError> {
        draft.validate()?;
        let alarm = draft.into_alarm(Uuid::new_v4(), now);
        self.alarms.push(alarm.clone());
        Ok(alarm)
    }

    pub fn update(&mut self, id: Uuid, update: AlarmUpdate) -> Result<Alarm, AppError> {
        self.update_at(id, update, Utc::now())
    }

    pub fn update_at(
        &mut self,
        id: Uuid,
        update: AlarmUpdate,
        now: DateTime<Utc>,
    ) -> Result<Alarm, AppError> {
        update.validate()?;
        let alarm = self
            .alarms
            .iter_mut()
            .find(|alarm| alarm.id == id)
            .ok_or_else(|| not_found(id))?;
        update.apply(alarm, now);
        Ok(alarm.clone())
    }

    pub fn toggle(&mut self, id: Uuid) -> Result<Alarm, AppError> {
        let is_active = self.get(id)?.is_active;
        self.update(
            id,
            AlarmUpdate {
                is_active: Some(!is_active),
                ..AlarmUpdate::default()
            },
        )
    }

    /// Moves the alarm to the trash so it can be restored later.
    pub fn delete(&mut self, id: Uuid) -> Result<Alarm, AppError> {
        let index = self
            .alarms
            .iter()
            .position(|alarm| alarm.id == id)
            .ok_or_else(|| not_found(id))?;
        let alarm = self.alarms.remove(index);
        self.deleted.retain(|existing| existing.id != id);
        self.deleted.push(alarm.clone());
        Ok(alarm)
    }

    pub fn restore(&mut self, id: Uuid) -> Result<Alarm, AppError> {
        self.restore_at(id, Utc::now())
    }

    pub fn restore_at(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Alarm, AppError> {
        let index = self
            .deleted
            .iter()
            .position(|alarm| alarm.id == id)
            .ok_or_else(|| not_found(id))?;
        let mut alarm = self.deleted.remove(index);
        alarm.updated_at = now;

        let slot = self
            .alarms
            .iter()
            .position(|existing| existing.created_at > alarm.created_at)
            .unwrap_or(self.alarms.len());
        self.alarms.insert(slot, alarm.clone());
        Ok(alarm)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("alarm {id} not found"))
}
