//! In-memory port implementations shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagesmith_types::error::{ChatError, DeployError, GenerationError, GitError, GitStep};
use pagesmith_types::session::ChatId;

use crate::chat::{ChatTransport, ImageRef, Reply};
use crate::deploy::Deployer;
use crate::generator::prompt::GenerationRequest;
use crate::generator::PageGenerator;
use crate::publish::{CheckoutMode, VersionControl, INDEX_FILE};

// ---------------------------------------------------------------------------
// Version control
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Clone,
    Discard,
    Checkout(String, CheckoutMode),
    Pull,
    ListBranches,
    Write(String),
    Stage(String),
    Commit(String),
    Push(String, bool),
}

#[derive(Debug, Default)]
pub struct VcsState {
    pub configured: bool,
    pub cloned: bool,
    pub current_branch: Option<String>,
    pub worktree: HashMap<String, Vec<u8>>,
    pub remote_branches: Vec<String>,
    /// Contents of `index.html` at each remote branch tip.
    pub remote_tips: HashMap<String, Vec<u8>>,
    pub fail_on: Option<GitStep>,
    pub calls: Vec<VcsCall>,
    /// Artificial latency added to `push`, to widen race windows.
    pub push_delay: Option<Duration>,
    /// Set while a publish sequence is between checkout and push.
    pub in_flight: bool,
    pub overlapped: bool,
}

/// Records every call; clones share state.
#[derive(Debug, Clone)]
pub struct MockVcs {
    inner: Arc<Mutex<VcsState>>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VcsState {
                configured: true,
                ..VcsState::default()
            })),
        }
    }

    /// A mock whose working copy already exists.
    pub fn cloned() -> Self {
        let vcs = Self::new();
        vcs.inner.lock().unwrap().cloned = true;
        vcs
    }

    pub fn set_configured(&self, configured: bool) {
        self.inner.lock().unwrap().configured = configured;
    }

    pub fn fail_on(&self, step: GitStep) {
        self.inner.lock().unwrap().fail_on = Some(step);
    }

    pub fn set_push_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().push_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, VcsState> {
        self.inner.lock().unwrap()
    }

    fn record(&self, call: VcsCall, step: GitStep) -> Result<(), GitError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(call);
        if state.fail_on == Some(step) {
            return Err(GitError::CommandFailed {
                step,
                status: Some(1),
                stderr: format!("{step} failed"),
            });
        }
        Ok(())
    }
}

impl VersionControl for MockVcs {
    fn is_configured(&self) -> bool {
        self.inner.lock().unwrap().configured
    }

    async fn exists(&self) -> bool {
        self.inner.lock().unwrap().cloned
    }

    async fn clone_remote(&self) -> Result<(), GitError> {
        self.record(VcsCall::Clone, GitStep::Clone)?;
        let mut state = self.inner.lock().unwrap();
        state.cloned = true;
        state.current_branch = Some("main".to_string());
        Ok(())
    }

    async fn default_branch(&self) -> Result<String, GitError> {
        Ok("main".to_string())
    }

    async fn discard_local_changes(&self) -> Result<(), GitError> {
        self.record(VcsCall::Discard, GitStep::Reset)?;
        self.inner.lock().unwrap().worktree.clear();
        Ok(())
    }

    async fn checkout(&self, branch: &str, mode: CheckoutMode) -> Result<(), GitError> {
        self.record(VcsCall::Checkout(branch.to_string(), mode), GitStep::Checkout)?;
        let mut state = self.inner.lock().unwrap();
        if branch != "main" {
            if state.in_flight {
                state.overlapped = true;
            }
            state.in_flight = true;
        }
        state.current_branch = Some(branch.to_string());
        Ok(())
    }

    async fn pull(&self) -> Result<(), GitError> {
        self.record(VcsCall::Pull, GitStep::Pull)
    }

    async fn remote_branches(&self) -> Result<Vec<String>, GitError> {
        self.record(VcsCall::ListBranches, GitStep::ListBranches)?;
        Ok(self.inner.lock().unwrap().remote_branches.clone())
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), GitError> {
        self.record(VcsCall::Write(path.to_string()), GitStep::WriteFile)?;
        self.inner
            .lock()
            .unwrap()
            .worktree
            .insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.record(VcsCall::Stage(path.to_string()), GitStep::Add)
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.record(VcsCall::Commit(message.to_string()), GitStep::Commit)
    }

    async fn push(&self, branch: &str, set_upstream: bool) -> Result<(), GitError> {
        let delay = self.inner.lock().unwrap().push_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(VcsCall::Push(branch.to_string(), set_upstream), GitStep::Push)?;
        let mut state = self.inner.lock().unwrap();
        if !state.remote_branches.iter().any(|b| b == branch) {
            state.remote_branches.push(branch.to_string());
        }
        let tip = state.worktree.get(INDEX_FILE).cloned().unwrap_or_default();
        state.remote_tips.insert(branch.to_string(), tip);
        state.in_flight = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum GenResponse {
    Html(String),
    Empty,
    TimedOut,
}

#[derive(Debug)]
struct GenState {
    configured: bool,
    response: GenResponse,
    requests: Vec<GenerationRequest>,
}

#[derive(Debug, Clone)]
pub struct MockGenerator {
    inner: Arc<Mutex<GenState>>,
}

impl MockGenerator {
    pub fn new(html: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GenState {
                configured: true,
                response: GenResponse::Html(html.to_string()),
                requests: Vec::new(),
            })),
        }
    }

    pub fn respond(&self, response: GenResponse) {
        self.inner.lock().unwrap().response = response;
    }

    pub fn set_configured(&self, configured: bool) {
        self.inner.lock().unwrap().configured = configured;
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl PageGenerator for MockGenerator {
    fn is_configured(&self) -> bool {
        self.inner.lock().unwrap().configured
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());
        match &state.response {
            GenResponse::Html(html) => Ok(html.clone()),
            GenResponse::Empty => Err(GenerationError::Empty),
            GenResponse::TimedOut => Err(GenerationError::TimedOut { seconds: 180 }),
        }
    }
}

// ---------------------------------------------------------------------------
// Deployer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DeployState {
    fail: bool,
    deploys: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct MockDeployer {
    inner: Arc<Mutex<DeployState>>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let deployer = Self::default();
        deployer.inner.lock().unwrap().fail = true;
        deployer
    }

    /// `(branch, channel_name)` for every deploy call.
    pub fn deploys(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().deploys.clone()
    }
}

impl Deployer for MockDeployer {
    async fn deploy(&self, branch: &str, channel_name: &str) -> Result<String, DeployError> {
        let mut state = self.inner.lock().unwrap();
        state
            .deploys
            .push((branch.to_string(), channel_name.to_string()));
        if state.fail {
            return Err(DeployError::SiteUnavailable { status: 404 });
        }
        Ok(format!("https://{}.example.app", branch))
    }
}

// ---------------------------------------------------------------------------
// Chat transport
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TransportState {
    sent: Vec<(ChatId, Reply)>,
    image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        let transport = Self::default();
        transport.inner.lock().unwrap().image = Some(vec![0x89, b'P', b'N', b'G']);
        transport
    }

    /// Make every image download fail.
    pub fn break_downloads(&self) {
        self.inner.lock().unwrap().image = None;
    }

    pub fn sent(&self) -> Vec<(ChatId, Reply)> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn last_text(&self) -> String {
        self.inner
            .lock()
            .unwrap()
            .sent
            .last()
            .map(|(_, reply)| reply.text.clone())
            .unwrap_or_default()
    }
}

impl ChatTransport for MockTransport {
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), ChatError> {
        self.inner.lock().unwrap().sent.push((chat, reply.clone()));
        Ok(())
    }

    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, ChatError> {
        self.inner
            .lock()
            .unwrap()
            .image
            .clone()
            .ok_or_else(|| ChatError::Download(format!("file {} unavailable", image.file_id)))
    }
}
