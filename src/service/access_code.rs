use crate::core::{Result, RhError};
use crate::linking::{AccessCodeView, LinkAccessCodeRequest, LinkingService};
use crate::repository::RespondentDataRepository;
use tracing::warn;

/// Query and link operations on access codes.
#[derive(Clone)]
pub struct AccessCodeService {
    repository: RespondentDataRepository,
    linker: LinkingService,
}

impl AccessCodeService {
    pub fn new(linker: LinkingService) -> Self {
        Self {
            repository: linker.repository().clone(),
            linker,
        }
    }

    /// The code merged with its linked case, or the code alone when it is
    /// unlinked or its case has not arrived yet.
    pub async fn get_access_code(&self, code_hash: &str) -> Result<AccessCodeView> {
        let code = self
            .repository
            .read_access_code(code_hash)
            .await?
            .ok_or_else(|| RhError::not_found(format!("Access code '{code_hash}' not found")))?;

        let Some(case_id) = code.case_id.as_deref() else {
            return Ok(AccessCodeView::from_code(&code));
        };

        match self.repository.read_case(case_id).await? {
            Some(case) => Ok(AccessCodeView::merged(&case, &code)),
            None => {
                warn!(code_hash, case_id, "access code references a case that is not stored");
                Ok(AccessCodeView::from_code(&code))
            }
        }
    }

    /// Runs the link on its own task. A caller that stops waiting does not
    /// cancel it; the link still runs to completion or failure.
    pub async fn link_access_code(
        &self,
        code_hash: &str,
        request: &LinkAccessCodeRequest,
    ) -> Result<AccessCodeView> {
        let linker = self.linker.clone();
        let code_hash = code_hash.to_string();
        let request = request.clone();
        tokio::spawn(async move { linker.link_access_code(&code_hash, &request).await }).await?
    }
}
