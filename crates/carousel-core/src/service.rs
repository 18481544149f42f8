//! Runtime wrapper around a decorated carousel
//!
//! One task owns the [`Document`] and the [`Carousel`]. Host events arrive on
//! an unbounded channel and are handled one at a time, to completion, in
//! delivery order; the auto-advance deadline is serviced by the same loop.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::controller::{Carousel, CarouselSnapshot, Controls, HostEvent};
use crate::dom::Document;
use crate::{Error, Result};

/// Task state: the document, its carousel and the channels feeding them
pub struct CarouselService {
    document: Document,
    carousel: Carousel,
    events: mpsc::UnboundedReceiver<HostEvent>,
    state_tx: watch::Sender<CarouselSnapshot>,
    shutdown: watch::Receiver<bool>,
}

/// Host-side handle to a running carousel
pub struct CarouselHandle {
    events: mpsc::UnboundedSender<HostEvent>,
    state: watch::Receiver<CarouselSnapshot>,
    shutdown: watch::Sender<bool>,
    controls: Controls,
    task: JoinHandle<Document>,
}

impl CarouselService {
    /// Spawn the service on the current tokio runtime
    pub fn spawn(document: Document, carousel: Carousel) -> CarouselHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(carousel.snapshot(&document));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let controls = carousel.controls().clone();

        let service = Self {
            document,
            carousel,
            events: event_rx,
            state_tx,
            shutdown: shutdown_rx,
        };
        let task = tokio::spawn(service.run());

        CarouselHandle {
            events: event_tx,
            state: state_rx,
            shutdown: shutdown_tx,
            controls,
            task,
        }
    }

    fn publish(&self) {
        // Only fails once every receiver is gone, which happens during teardown
        let _ = self
            .state_tx
            .send(self.carousel.snapshot(&self.document));
    }

    /// Handle events and timer ticks until shutdown or until all handles drop
    async fn run(mut self) -> Document {
        info!("Carousel service started");

        loop {
            tokio::select! {
                // Input already queued wins over a simultaneous tick
                biased;

                result = self.shutdown.changed() => {
                    if result.is_err() || *self.shutdown.borrow() {
                        info!("Carousel service received shutdown signal");
                        break;
                    }
                }

                event = self.events.recv() => {
                    let Some(event) = event else {
                        debug!("All carousel handles dropped");
                        break;
                    };
                    let dispatch = self.carousel.handle_event(&mut self.document, event);
                    if dispatch.command.is_some() && !dispatch.applied {
                        debug!("Ignored {:?} at slide {}", dispatch.command, self.carousel.current_index());
                    }
                    self.publish();
                }

                _ = self.carousel.timer().wait() => {
                    self.carousel.on_timer_tick(&mut self.document);
                    self.publish();
                }
            }
        }

        self.carousel.dispose();
        self.publish();
        self.document
    }
}

impl CarouselHandle {
    /// Queue a host event
    pub fn send(&self, event: HostEvent) -> Result<()> {
        self.events.send(event).map_err(|_| Error::ServiceClosed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that changes after every handled event or tick
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.state.clone()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the service, cancel the timer and return the document
    pub async fn dispose(self) -> Result<Document> {
        if self.shutdown.send(true).is_err() {
            warn!("Carousel service already stopped");
        }
        self.task
            .await
            .map_err(|e| Error::Other(format!("Carousel task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CarouselConfig, ExtractConfig};
    use std::time::Duration;
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_millis(5000);

    fn spawn(slides: usize) -> CarouselHandle {
        let mut html = String::from(r#"<div class="carousel">"#);
        for i in 0..slides {
            html.push_str(&format!("<div><div></div><div>slide {i}</div></div>"));
        }
        html.push_str("</div>");

        let mut doc = Document::parse(&html).unwrap();
        let block = doc.find_by_class(doc.root(), "carousel").unwrap();
        let carousel = Carousel::decorate(
            &mut doc,
            block,
            &CarouselConfig::default(),
            &ExtractConfig::default(),
        )
        .unwrap()
        .unwrap();
        CarouselService::spawn(doc, carousel)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_advances_and_wraps() {
        let handle = spawn(3);

        sleep(PERIOD + Duration::from_millis(1)).await;
        assert_eq!(handle.snapshot().current_index, 1);

        sleep(PERIOD).await;
        assert_eq!(handle.snapshot().current_index, 2);

        sleep(PERIOD).await;
        let snap = handle.snapshot();
        assert_eq!(snap.current_index, 0);
        assert_eq!(snap.active_dot, Some(0));
        assert_eq!(snap.transitions, 3);

        handle.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_cycles_leave_single_timer() {
        let handle = spawn(4);

        for _ in 0..5 {
            handle.send(HostEvent::PointerEnter).unwrap();
            handle.send(HostEvent::PointerLeave).unwrap();
        }

        sleep(PERIOD + Duration::from_millis(1)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.transitions, 1);
        assert_eq!(snap.current_index, 1);
        assert!(snap.auto_advance_active);

        handle.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_suspends_ticks() {
        let handle = spawn(4);

        handle.send(HostEvent::PointerEnter).unwrap();
        sleep(PERIOD * 3).await;
        let snap = handle.snapshot();
        assert_eq!(snap.transitions, 0);
        assert!(!snap.auto_advance_active);

        // Leaving schedules a fresh full period
        handle.send(HostEvent::PointerLeave).unwrap();
        sleep(PERIOD - Duration::from_millis(1)).await;
        assert_eq!(handle.snapshot().transitions, 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(handle.snapshot().transitions, 1);

        handle.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_apply_in_order() {
        let handle = spawn(4);
        let controls = handle.controls().clone();
        let mut rx = handle.subscribe();

        handle.send(HostEvent::Click { target: controls.dots[3] }).unwrap();
        handle.send(HostEvent::Click { target: controls.prev }).unwrap();
        handle.send(HostEvent::Click { target: controls.prev }).unwrap();

        rx.wait_for(|snap| snap.transitions == 3).await.unwrap();
        let snap = handle.snapshot();
        assert_eq!(snap.current_index, 1);
        assert!(!snap.prev_disabled);

        handle.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_returns_document_and_stops_timer() {
        let handle = spawn(2);
        let mut rx = handle.subscribe();
        let track = handle.controls().track;

        let doc = handle.dispose().await.unwrap();
        rx.wait_for(|snap| snap.disposed).await.unwrap();
        assert!(!rx.borrow().auto_advance_active);
        assert_eq!(
            doc.style_property(track, "transform").as_deref(),
            Some("translateX(0%)")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after_stop_fails() {
        let handle = spawn(2);
        let events = handle.events.clone();
        handle.dispose().await.unwrap();

        assert!(events.send(HostEvent::PointerEnter).is_err());
    }
}
