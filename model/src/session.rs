use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use geom::{Distance, Time};

use catalogue::{Catalogue, GeoPoint, LineId};

use crate::{
    project, ActiveLines, CameraMove, Frame, Selection, SelectionState, Settings, Simulator,
    TapTarget, Ticker, Vehicle, VehicleDetails,
};

/// Everything that can change the live map. Hosts and the tick timer post these; only the
/// session applies them.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Tick,
    ToggleLine(LineId),
    SetActiveLines(Vec<LineId>),
    /// From a tab or another screen
    SelectLine(LineId),
    /// Activates the line if needed, then selects it
    PressLineRow(LineId),
    TapMap(GeoPoint),
}

/// What a host should react to after events are applied
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    ActiveLinesChanged(Vec<LineId>),
    VehiclesMoved,
    SelectionChanged(SelectionState),
    CameraMoved(CameraMove),
    VehiclePressed(VehicleDetails),
}

/// Cheap to clone; hand one to anything that needs to poke the live map.
#[derive(Clone)]
pub struct EventSender {
    tx: UnboundedSender<Event>,
}

impl EventSender {
    /// Returns false if the session is gone
    pub fn send(&self, ev: Event) -> bool {
        self.tx.unbounded_send(ev).is_ok()
    }
}

/// The single owner of all live map state. Every mutation funnels through `handle`, either
/// directly or via the queue drained by `pump`, so there's only ever one writer.
pub struct Session {
    catalogue: Catalogue,
    settings: Settings,

    active: ActiveLines,
    simulator: Simulator,
    selection: Selection,
    clock: Time,

    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    ticker: Option<Ticker>,
}

impl Session {
    pub fn new(catalogue: Catalogue, settings: Settings) -> Self {
        let (tx, rx) = unbounded();
        let simulator = Simulator::new(settings.reseed);
        Self {
            catalogue,
            settings,

            active: ActiveLines::new(),
            simulator,
            selection: Selection::new(),
            clock: Time::START_OF_DAY,

            tx,
            rx,
            ticker: None,
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Starts posting `Event::Tick` every tick period. Idempotent.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let sender = self.sender();
        info!("Starting ticks every {}", self.settings.tick_period());
        self.ticker = Some(Ticker::start(self.settings.tick_period(), move || {
            sender.send(Event::Tick)
        }));
    }

    /// Cancels the tick timer. Ticks already queued are still applied by the next `pump`.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
            info!("Stopped ticking at {}", self.clock);
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Applies every queued event, in order
    pub fn pump(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        // Err means the queue is empty right now. Ok(None) can't happen while we hold a sender.
        while let Ok(Some(ev)) = self.rx.try_next() {
            outcomes.extend(self.handle(ev));
        }
        outcomes
    }

    pub fn handle(&mut self, ev: Event) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        match ev {
            Event::Tick => {
                self.simulator.tick(&self.catalogue);
                self.clock += self.settings.tick_period();
                outcomes.push(Outcome::VehiclesMoved);
            }
            Event::ToggleLine(line) => {
                let selected_was_active = self.selected_is_active();
                let now_active = self.active.toggle(&line);
                debug!(
                    "Line {line} is now {}",
                    if now_active { "active" } else { "inactive" }
                );
                self.on_active_lines_changed(selected_was_active, &mut outcomes);
            }
            Event::SetActiveLines(lines) => {
                let selected_was_active = self.selected_is_active();
                self.active = lines.into_iter().collect();
                self.on_active_lines_changed(selected_was_active, &mut outcomes);
            }
            Event::SelectLine(line) => {
                let camera = self
                    .selection
                    .select_line(&line, &self.catalogue, &self.settings);
                self.on_selected(camera, &mut outcomes);
            }
            Event::PressLineRow(line) => {
                let selected_was_active = self.selected_is_active();
                if self.active.activate(&line) {
                    self.on_active_lines_changed(selected_was_active, &mut outcomes);
                }
                let camera = self
                    .selection
                    .select_line(&line, &self.catalogue, &self.settings);
                self.on_selected(camera, &mut outcomes);
            }
            Event::TapMap(pt) => {
                let target = self.frame().hit_test(
                    pt,
                    Distance::meters(self.settings.tap_tolerance_meters),
                    Distance::meters(self.settings.marker_radius_meters),
                );
                match target {
                    TapTarget::Vehicle(id) => {
                        if let Some(details) = self.simulator.find(&id).and_then(|pos| {
                            VehicleDetails::new(pos, &self.catalogue, self.settings.tick_period())
                        }) {
                            outcomes.push(Outcome::VehiclePressed(details));
                        }
                    }
                    TapTarget::Route(line) => {
                        let camera = self
                            .selection
                            .tap_route(&line, &self.catalogue, &self.settings);
                        self.on_selected(camera, &mut outcomes);
                    }
                    TapTarget::Background => {
                        if self.selection.tap_background() {
                            outcomes.push(Outcome::SelectionChanged(SelectionState::Unselected));
                        }
                    }
                }
            }
        }
        outcomes
    }

    fn selected_is_active(&self) -> bool {
        self.selection
            .selected()
            .map(|line| self.active.contains(line))
            .unwrap_or(false)
    }

    // A line selected from elsewhere may never have been active; only clear the selection when
    // this change actually removed it.
    fn on_active_lines_changed(
        &mut self,
        selected_was_active: bool,
        outcomes: &mut Vec<Outcome>,
    ) {
        self.simulator.reseed(&self.catalogue, self.active.as_slice());
        outcomes.push(Outcome::ActiveLinesChanged(self.active.as_slice().to_vec()));

        if selected_was_active && !self.selected_is_active() && self.selection.clear() {
            outcomes.push(Outcome::SelectionChanged(SelectionState::Unselected));
        }
    }

    // None means the selection didn't change
    fn on_selected(&self, camera: Option<CameraMove>, outcomes: &mut Vec<Outcome>) {
        if let Some(camera) = camera {
            outcomes.push(Outcome::SelectionChanged(self.selection.state().clone()));
            outcomes.push(Outcome::CameraMoved(camera));
        }
    }

    pub fn frame(&self) -> Frame {
        project(
            &self.active,
            &self.catalogue,
            &self.vehicles(),
            self.selection.state(),
            &self.settings,
        )
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.simulator.vehicles(&self.catalogue)
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn latest_camera_move(&self) -> Option<&CameraMove> {
        self.selection.latest_camera_move()
    }

    pub fn active_lines(&self) -> &ActiveLines {
        &self.active
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> Time {
        self.clock
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
