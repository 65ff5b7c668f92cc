use crate::{
    error::{RelayError, Result},
    logger,
    models::{GenerationOutcome, GenerationRequest, UpstreamCreateRequest},
    relay::{
        aspect::image_size_for,
        href::extract_href,
        poll::{poll_until_terminal, PollOutcome, PollPolicy},
        prompt::build_prompt,
    },
    upstream::ImageProvider,
};
use std::sync::Arc;

pub type PromptBuilder = fn(&GenerationRequest) -> String;

/// Submits generation requests upstream and resolves the resulting image URL.
#[derive(Clone)]
pub struct GenerationRelay {
    provider: Arc<dyn ImageProvider>,
    policy: PollPolicy,
    prompt_builder: PromptBuilder,
}

impl GenerationRelay {
    pub fn new(provider: Arc<dyn ImageProvider>, policy: PollPolicy) -> Self {
        Self {
            provider,
            policy,
            prompt_builder: build_prompt,
        }
    }

    pub fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.prompt_builder = builder;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// The explicit prompt when it is non-blank, otherwise one built from the form fields.
    /// Only an empty built prompt is rejected.
    pub fn resolve_prompt(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = match request.explicit_prompt() {
            Some(prompt) => prompt.to_string(),
            None => (self.prompt_builder)(request),
        };

        if prompt.is_empty() {
            return Err(RelayError::MissingPrompt);
        }
        Ok(prompt)
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        let prompt = self.resolve_prompt(request)?;
        if !self.provider.is_authenticated() {
            return Err(RelayError::MissingApiToken);
        }

        let size = image_size_for(request.aspect_ratio.as_deref());
        let _timer = logger::timer("generation");
        log::info!(
            "Generating {} at {}x{} (prompt: {} chars)",
            request.kind().label().to_lowercase(),
            size.width,
            size.height,
            prompt.chars().count()
        );

        let reply = self
            .provider
            .create(&UpstreamCreateRequest::new(prompt, size))
            .await?;

        if !reply.is_success() {
            log::warn!("Upstream create failed with status {}", reply.status);
            return Err(RelayError::UpstreamCreateFailed {
                status: reply.status,
                detail: reply.body,
            });
        }

        if let Some(href) = reply.body.as_ref().and_then(extract_href) {
            log::info!("Image available immediately");
            return Ok(GenerationOutcome::Resolved { href, attempts: 0 });
        }

        let job_id = match reply.job_id() {
            Some(job_id) => job_id,
            None => {
                log::warn!("Upstream reply has neither an image nor a job id");
                return Ok(GenerationOutcome::NoImage { output: reply.body });
            }
        };

        log::info!("Polling job {}", job_id);
        let outcome =
            poll_until_terminal(&self.policy, || self.provider.job_status(&job_id)).await?;

        match outcome {
            PollOutcome::Resolved { href, attempts } => {
                log::info!("Job {} resolved after {} attempt(s)", job_id, attempts);
                Ok(GenerationOutcome::Resolved { href, attempts })
            }
            PollOutcome::Failed { detail, attempts } => {
                log::warn!("Job {} failed after {} attempt(s): {}", job_id, attempts, detail);
                Err(RelayError::JobFailed(detail))
            }
            PollOutcome::Exhausted { attempts } => {
                log::warn!("Job {} still pending after {} attempts", job_id, attempts);
                Ok(GenerationOutcome::NoImage { output: reply.body })
            }
        }
    }
}
