//! # Repository Provisioning
//!
//! Given the name of a destination repository, make sure it exists and hand
//! back its clone URL. The [`Provisioner`] sits on top of a [`HostingApi`]
//! and adds the policy the splitter needs:
//!
//! - In dry-run mode no request is made; the clone URL is synthesized from the
//!   configured web host and owner.
//! - An existing repository is reused, and is *not* recorded as created.
//! - A missing repository is created public and empty, then recorded.
//! - Any failure is logged and reported as "no URL" so the caller can skip the
//!   target and carry on with the rest of the run.

use crate::error::Result;
use crate::hosting::{HostingApi, NewRepository, Owner};

/// A repository this run created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub clone_url: String,
}

/// Create-or-reuse front end over a hosting API.
pub struct Provisioner<'a> {
    api: &'a dyn HostingApi,
    owner: Owner,
    web_host: String,
    dry_run: bool,
    created: Vec<RepositoryRecord>,
}

impl<'a> Provisioner<'a> {
    pub fn new(api: &'a dyn HostingApi, owner: Owner, web_host: &str, dry_run: bool) -> Self {
        Self {
            api,
            owner,
            web_host: web_host.to_string(),
            dry_run,
            created: Vec::new(),
        }
    }

    /// The clone URL `name` has, or will have, without asking the API.
    pub fn expected_clone_url(&self, name: &str) -> String {
        format!("https://{}/{}/{}.git", self.web_host, self.owner.login(), name)
    }

    /// Ensure `name` exists and return its clone URL.
    ///
    /// Returns `None` when the repository could neither be found nor
    /// created; the reason has already been logged.
    pub fn provision(&mut self, name: &str, description: &str) -> Option<String> {
        if self.dry_run {
            log::info!("[DRY RUN] Would create repo: {}", name);
            return Some(self.expected_clone_url(name));
        }

        match self.find_or_create(name, description) {
            Ok(url) => Some(url),
            Err(e) => {
                log::error!("Failed to create repository {}: {}", name, e);
                None
            }
        }
    }

    fn find_or_create(&mut self, name: &str, description: &str) -> Result<String> {
        if let Some(existing) = self.api.get_repository(self.owner.login(), name)? {
            log::warn!("Repository {} already exists, skipping creation", name);
            return Ok(existing.clone_url);
        }

        let request = NewRepository::public(name, description);
        let repo = match &self.owner {
            Owner::User(_) => self.api.create_user_repository(&request)?,
            Owner::Organization(org) => self.api.create_org_repository(org, &request)?,
        };

        log::info!("Created repository: {}", name);
        self.created.push(RepositoryRecord {
            name: name.to_string(),
            clone_url: repo.clone_url.clone(),
        });
        Ok(repo.clone_url)
    }

    /// Repositories created so far, in creation order.
    pub fn created(&self) -> &[RepositoryRecord] {
        &self.created
    }

    pub fn into_created(self) -> Vec<RepositoryRecord> {
        self.created
    }
}
