//! # Adherence Engine
//!
//! Application-layer flow behind the "predict my next dose" action:
//! encode → predict → append to the signed-in user's history → reload the
//! history for display.
//!
//! The active user is resolved from the identity provider at the start of
//! every call, and weights are passed in by the caller. Nothing is cached
//! between calls.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::error::{AdherenceError, Result};
use crate::core::identity::{resolve_uid, IdentityProvider};
use crate::features::history::{
    AdherenceHistoryStore, EntryIdGenerator, KeyValueStore, PredictionEntry,
};
use crate::features::prediction::{MissPredictor, Prediction, PredictionContext, WeightVector};
use log::{info, warn};

/// Whether the prediction made it into the user's history
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    /// Persisted; carries the reloaded history in insertion order, or `None`
    /// when the entry was stored but the history could not be read back
    Saved {
        history: Option<Vec<PredictionEntry>>,
    },
    /// Not persisted; the prediction itself is still valid
    NotSaved { reason: AdherenceError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub prediction: Prediction,
    pub entry: PredictionEntry,
    pub save_status: SaveStatus,
}

impl PredictionOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.save_status, SaveStatus::Saved { .. })
    }

    /// Non-fatal notice to show next to the result when saving failed
    pub fn save_notice(&self) -> Option<String> {
        match &self.save_status {
            SaveStatus::Saved { .. } => None,
            SaveStatus::NotSaved { reason } => {
                Some(format!("Prediction could not be saved: {reason}"))
            }
        }
    }
}

pub struct AdherenceEngine<S> {
    history: AdherenceHistoryStore<S>,
    predictor: MissPredictor,
    ids: EntryIdGenerator,
}

impl<S: KeyValueStore> AdherenceEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_predictor(store, MissPredictor::default())
    }

    pub fn with_predictor(store: S, predictor: MissPredictor) -> Self {
        AdherenceEngine {
            history: AdherenceHistoryStore::new(store),
            predictor,
            ids: EntryIdGenerator::new(),
        }
    }

    pub fn predictor(&self) -> &MissPredictor {
        &self.predictor
    }

    /// Predict the miss probability for `context` and record it for the
    /// signed-in user.
    ///
    /// Fails up front with `Unauthenticated` when nobody is signed in, and with
    /// `InvalidInput`/`DimensionMismatch` when prediction is impossible. A
    /// failed append does not fail the call; it is reported through
    /// [`SaveStatus::NotSaved`]. Only the append decides whether the entry was
    /// saved; a failed reload afterwards yields `Saved { history: None }`.
    pub async fn predict_and_record(
        &self,
        identity: &dyn IdentityProvider,
        context: &PredictionContext,
        weights: &WeightVector,
    ) -> Result<PredictionOutcome> {
        let uid = resolve_uid(identity)?;

        let prediction = self.predictor.assess(context, weights)?;
        if prediction.alert {
            info!(
                "Miss alert for {uid}: {:.2}% chance of missing the next dose",
                prediction.probability_percent()
            );
        }

        let entry = PredictionEntry::new(self.ids.next_id(), context, &prediction);

        let save_status = match self.history.append(&uid, &entry).await {
            Ok(()) => SaveStatus::Saved {
                history: self.reload(&uid).await,
            },
            Err(reason) => {
                warn!("Prediction {} for {uid} not saved: {reason}", entry.id);
                SaveStatus::NotSaved { reason }
            }
        };

        Ok(PredictionOutcome {
            prediction,
            entry,
            save_status,
        })
    }

    async fn reload(&self, uid: &str) -> Option<Vec<PredictionEntry>> {
        match self.history.load(uid).await {
            Ok(history) => Some(history),
            Err(e) => {
                warn!("Saved prediction for {uid} but could not reload history: {e}");
                None
            }
        }
    }

    /// The signed-in user's history in insertion order
    pub async fn history(&self, identity: &dyn IdentityProvider) -> Result<Vec<PredictionEntry>> {
        let uid = resolve_uid(identity)?;
        self.history.load(&uid).await
    }

    /// Delete the signed-in user's history
    pub async fn clear_history(&self, identity: &dyn IdentityProvider) -> Result<()> {
        let uid = resolve_uid(identity)?;
        self.history.clear(&uid).await?;
        info!("Cleared adherence history for {uid}");
        Ok(())
    }
}
