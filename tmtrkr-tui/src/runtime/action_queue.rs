use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Work that needs the API client; queued by key handlers and run after
/// each input poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Action {
    RefreshRecords,
    SaveRecord,
    SaveAsNewRecord,
    DeleteConfirmedRecord,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
