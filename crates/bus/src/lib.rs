use html::{DomPatch, PatchKey};
use resolver::ComponentRegistry;
use serde_json::Value;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Everything the content-editing host tells a mounted injector.
///
/// Events are processed one at a time, in order, on the injector's thread.
#[derive(Debug)]
pub enum HostEvent {
    /// The edit view was mounted; start observing and run a first pass.
    Mount,
    /// The host's rendering layer changed the edit view.
    DomPatches(Vec<DomPatch>),
    /// New current form values; `None` while none are available.
    ValuesChanged(Option<Value>),
    LoadingChanged(bool),
    /// The host's component schema map, keyed by variant uid.
    ComponentsChanged(ComponentRegistry),
    /// The user activated a node; duplicates when it lies inside an injected control.
    Activate(PatchKey),
    /// The edit view is being torn down. Terminal.
    Unmount,
}

pub struct Bus {
    pub evt_tx: Sender<HostEvent>,
    pub evt_rx: Receiver<HostEvent>,
}

impl Bus {
    pub fn new() -> Self {
        let (evt_tx, evt_rx) = channel();
        Self { evt_tx, evt_rx }
    }

    pub fn split(self) -> (Sender<HostEvent>, Receiver<HostEvent>) {
        (self.evt_tx, self.evt_rx)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_send_order() {
        let (tx, rx) = Bus::new().split();
        tx.send(HostEvent::Mount).expect("send");
        tx.send(HostEvent::LoadingChanged(true)).expect("send");
        tx.send(HostEvent::Unmount).expect("send");
        drop(tx);
        let order: Vec<&str> = rx
            .iter()
            .map(|e| match e {
                HostEvent::Mount => "mount",
                HostEvent::LoadingChanged(_) => "loading",
                HostEvent::Unmount => "unmount",
                _ => "other",
            })
            .collect();
        assert_eq!(order, vec!["mount", "loading", "unmount"]);
    }
}
