use tokio_util::sync::CancellationToken;

/// Per-operation settings, passed explicitly to every transaction call.
///
/// Carries the cancellation signal and the author attached to change
/// descriptions. Cloning shares the same cancellation token.
#[derive(Clone, Debug, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    author: Option<String>,
}

impl OpContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing token, e.g. a child of a request-scoped token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel every operation running under this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ctx = OpContext::new().with_author("alice");
        let other = ctx.clone();
        assert!(!other.is_cancelled());
        ctx.cancel();
        assert!(other.is_cancelled());
        assert_eq!(other.author(), Some("alice"));
    }

    #[test]
    fn child_token_follows_parent() {
        let parent = CancellationToken::new();
        let ctx = OpContext::new().with_cancellation(parent.child_token());
        parent.cancel();
        assert!(ctx.is_cancelled());
    }
}
