use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::client::IncidentApi;
use crate::error::ApiError;
use crate::models::{Incident, IncidentReport, Notification, SubmitAck};

/// Outcome of the most recent action on a given surface, so a UI can
/// render failure state instead of losing it in a log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionOutcome {
    #[default]
    Idle,
    Ok,
    Failed(String),
}

/// Orders overlapping reloads of one list. Every reload takes a ticket
/// before the request goes out; a response is applied only if nothing
/// with a newer ticket has been applied already, so a slow old response
/// cannot overwrite a fresher list.
#[derive(Debug, Default)]
struct ReloadSeq {
    issued: u64,
    applied: u64,
}

impl ReloadSeq {
    fn ticket(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn try_apply(&mut self, ticket: u64) -> bool {
        if ticket > self.applied {
            self.applied = ticket;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    form: IncidentReport,
    incidents: Vec<Incident>,
    notifications: Vec<Notification>,
    selected: Option<Incident>,
    submit_outcome: ActionOutcome,
    incidents_outcome: ActionOutcome,
    notifications_outcome: ActionOutcome,
    status_outcome: ActionOutcome,
    incidents_seq: ReloadSeq,
    notifications_seq: ReloadSeq,
}

/// Holds the draft report and the two display lists, and turns user
/// actions (and poll ticks) into transport calls. State is shared behind
/// a mutex so the poller and user actions can overlap; list writes are
/// ordered by [`ReloadSeq`].
#[derive(Clone)]
pub struct IncidentController {
    api: IncidentApi,
    state: Arc<Mutex<ControllerState>>,
}

impl IncidentController {
    pub fn new(api: IncidentApi) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    /// The on-init double read: incidents and notifications.
    pub async fn refresh(&self) {
        tokio::join!(self.load_incidents(), self.load_notifications());
    }

    /// Mutate the draft report in place, the way form bindings would.
    pub async fn edit_form(&self, edit: impl FnOnce(&mut IncidentReport)) {
        let mut st = self.state.lock().await;
        edit(&mut st.form);
    }

    /// Stamps the submission time into the draft and sends it. On success
    /// the incident list is reloaded and the draft is reset to defaults;
    /// on failure the draft is left untouched for the user to retry.
    pub async fn submit(&self) -> Result<SubmitAck, ApiError> {
        let report = {
            let mut st = self.state.lock().await;
            st.form.incident_info.date = Utc::now();
            st.form.clone()
        };

        match self.api.submit_incident(&report).await {
            Ok(ack) => {
                info!(incident_id = ?ack.incident_id, "incident submitted");
                self.load_incidents().await;
                let mut st = self.state.lock().await;
                st.form = IncidentReport::default();
                st.submit_outcome = ActionOutcome::Ok;
                Ok(ack)
            }
            Err(e) => {
                error!("incident submission failed: {e}");
                let mut st = self.state.lock().await;
                st.submit_outcome = ActionOutcome::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch-all incidents. On success the whole list is replaced (unless
    /// a newer reload already landed); on any failure the previous list
    /// stays visible.
    pub async fn load_incidents(&self) {
        let ticket = self.state.lock().await.incidents_seq.ticket();
        match self.api.list_incidents().await {
            Ok(incidents) => {
                let mut st = self.state.lock().await;
                if st.incidents_seq.try_apply(ticket) {
                    st.incidents = incidents;
                    st.incidents_outcome = ActionOutcome::Ok;
                } else {
                    debug!(ticket, "dropping stale incident list response");
                }
            }
            Err(e) => {
                warn!("loading incidents failed: {e}");
                let mut st = self.state.lock().await;
                st.incidents_outcome = ActionOutcome::Failed(e.to_string());
            }
        }
    }

    /// Fetch-all notifications, same replace-or-keep policy as incidents.
    pub async fn load_notifications(&self) {
        let ticket = self.state.lock().await.notifications_seq.ticket();
        match self.api.list_notifications().await {
            Ok(notifications) => {
                let mut st = self.state.lock().await;
                if st.notifications_seq.try_apply(ticket) {
                    st.notifications = notifications;
                    st.notifications_outcome = ActionOutcome::Ok;
                } else {
                    debug!(ticket, "dropping stale notification list response");
                }
            }
            Err(e) => {
                warn!("loading notifications failed: {e}");
                let mut st = self.state.lock().await;
                st.notifications_outcome = ActionOutcome::Failed(e.to_string());
            }
        }
    }

    /// Fetch one incident and remember it as the current selection.
    pub async fn view_details(&self, incident_id: &str) -> Result<Incident, ApiError> {
        match self.api.get_incident(incident_id).await {
            Ok(incident) => {
                let mut st = self.state.lock().await;
                st.selected = Some(incident.clone());
                Ok(incident)
            }
            Err(e) => {
                warn!(incident_id, "loading incident details failed: {e}");
                Err(e)
            }
        }
    }

    /// Fire a status update, then reload both lists exactly once each,
    /// whatever the update returned. The update's own outcome is still
    /// recorded so the failure is visible.
    pub async fn update_status(&self, incident_id: &str, status: &str) -> Result<(), ApiError> {
        let result = self.api.update_status(incident_id, status).await;
        {
            let mut st = self.state.lock().await;
            st.status_outcome = match &result {
                Ok(_) => {
                    info!(incident_id, status, "incident status updated");
                    ActionOutcome::Ok
                }
                Err(e) => {
                    error!(incident_id, status, "status update failed: {e}");
                    ActionOutcome::Failed(e.to_string())
                }
            };
        }

        self.load_incidents().await;
        self.load_notifications().await;
        result.map(|_| ())
    }

    pub async fn form(&self) -> IncidentReport {
        self.state.lock().await.form.clone()
    }

    pub async fn incidents(&self) -> Vec<Incident> {
        self.state.lock().await.incidents.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.lock().await.notifications.clone()
    }

    pub async fn selected(&self) -> Option<Incident> {
        self.state.lock().await.selected.clone()
    }

    pub async fn submit_outcome(&self) -> ActionOutcome {
        self.state.lock().await.submit_outcome.clone()
    }

    pub async fn incidents_outcome(&self) -> ActionOutcome {
        self.state.lock().await.incidents_outcome.clone()
    }

    pub async fn notifications_outcome(&self) -> ActionOutcome {
        self.state.lock().await.notifications_outcome.clone()
    }

    pub async fn status_outcome(&self) -> ActionOutcome {
        self.state.lock().await.status_outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_seq_applies_in_order() {
        let mut seq = ReloadSeq::default();
        let first = seq.ticket();
        let second = seq.ticket();
        assert!(seq.try_apply(first));
        assert!(seq.try_apply(second));
    }

    #[test]
    fn reload_seq_drops_stale_response() {
        let mut seq = ReloadSeq::default();
        let old = seq.ticket();
        let new = seq.ticket();
        // The newer request completes first.
        assert!(seq.try_apply(new));
        assert!(!seq.try_apply(old));
    }

    #[test]
    fn outcome_defaults_to_idle() {
        assert_eq!(ActionOutcome::default(), ActionOutcome::Idle);
    }
}
