use dioxus::prelude::*;
use lotto_api::prelude::{LotteryDetail, LottoError};

use crate::Services;

/// Detail plus ticket count for one lottery. `restart()` re-fetches.
pub fn use_lottery(id: String) -> Resource<Result<LotteryDetail, String>> {
    let services = use_context::<Services>();

    use_resource(use_reactive!(|(id,)| {
        let services = services.clone();
        async move {
            let detail = services.api()?.lottery(&id).await;
            detail.map_err(|e| {
                tracing::error!("Failed to fetch lottery {}: {}", id, e);
                match e {
                    LottoError::Status { status: 404, .. } => "Lottery not found".to_string(),
                    e => e.user_message(),
                }
            })
        }
    }))
}
