/// Lifecycle of one engine request as seen by its callback adapter.
///
/// `Created → Started → ResponseStarted → Reading* → {Succeeded | Failed | Canceled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterState {
    /// Adapter constructed, request not yet handed to the engine.
    #[default]
    Created,

    /// Engine request started; redirects may arrive here.
    Started,

    /// Response headers received, first read issued.
    ResponseStarted,

    /// At least one body chunk received.
    Reading,

    /// Engine reported success.
    Succeeded,

    /// Engine reported a transport fault.
    Failed,

    /// Engine request was canceled.
    Canceled,
}

impl AdapterState {
    /// Whether this is one of the three terminal states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdapterState::Succeeded | AdapterState::Failed | AdapterState::Canceled
        )
    }
}
