//! Get-or-create arbitration for UIC codes
//!
//! The externally observable guarantee is "one identifier per
//! distinct normalized input", not "first writer wins": a concurrent
//! insert loser re-reads and returns the winner's record.

use chrono::Utc;
use tracing::{info, warn};
use uic_common::{Error, Result};

use super::{codec, CollectedAnswers, NormalizedAnswers, UicRecord};
use crate::db::records::FingerprintIndex;

/// Result of a mint-or-reuse call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub uic_code: String,
    pub is_new: bool,
}

/// Mints new UIC codes or returns previously issued ones.
///
/// Side effects are confined to the fingerprint index.
pub struct UicMinter<F> {
    index: F,
    salt: String,
    append_suffix: bool,
}

impl<F: FingerprintIndex> UicMinter<F> {
    pub fn new(index: F, salt: impl Into<String>, append_suffix: bool) -> Self {
        Self {
            index,
            salt: salt.into(),
            append_suffix,
        }
    }

    /// Get-or-create the identifier for these five answers.
    ///
    /// Normalizes, fingerprints, and looks up; an existing active
    /// record is touched (request count, last-requested timestamp)
    /// and returned. Otherwise a new code is encoded and inserted
    /// under the fingerprint.
    pub async fn mint_or_reuse(
        &self,
        owner: &str,
        raw: &CollectedAnswers,
    ) -> Result<MintOutcome> {
        let answers = NormalizedAnswers::from_raw(raw);
        let fp = codec::fingerprint(&answers);

        if let Some(existing) = self.index.find_by_fingerprint(&fp).await? {
            self.index.touch(&fp, Utc::now()).await?;
            info!(
                uic_code = %existing.uic_code,
                request_count = existing.request_count + 1,
                "Returning existing UIC"
            );
            return Ok(MintOutcome {
                uic_code: existing.uic_code,
                is_new: false,
            });
        }

        let mut uic_code = codec::encode(&answers);
        if self.append_suffix {
            uic_code = format!("{}-{}", uic_code, codec::hash_suffix(&answers, &self.salt));
        }

        let now = Utc::now();
        let record = UicRecord {
            uic_code: uic_code.clone(),
            phone_number: owner.to_string(),
            answers,
            fingerprint: fp.clone(),
            created_at: now,
            last_requested_at: now,
            request_count: 1,
            is_active: true,
        };

        match self.index.insert(&record).await {
            Ok(()) => {
                info!(uic_code = %uic_code, "Created new UIC");
                Ok(MintOutcome {
                    uic_code,
                    is_new: true,
                })
            }
            Err(Error::Conflict(_)) => {
                // Lost a concurrent race (or collided with the code of
                // a deactivated record). Fall back to the winner.
                warn!("UIC insert conflict, re-reading winner");
                let winner = self.index.find_by_fingerprint(&fp).await?.ok_or_else(|| {
                    Error::Internal(
                        "UIC insert conflicted but no active record is readable".to_string(),
                    )
                })?;
                self.index.touch(&fp, Utc::now()).await?;
                Ok(MintOutcome {
                    uic_code: winner.uic_code,
                    is_new: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}
