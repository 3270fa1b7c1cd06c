use campuswalk_common::Time;
use campuswalk_ecs::{Ecs, Phase};
use campuswalk_input::InputState;
use campuswalk_net::NetLink;
use campuswalk_render::DrawContext;
use tracing::error;

/// Receives modal content when an interaction opens one. The host UI
/// owns presentation; the simulation only hands over the content key.
pub type ModalSink = Box<dyn FnMut(&str)>;

/// Everything a system can reach: the component registry, input state,
/// the draw recorder, and the socket seam.
///
/// Fields are public so systems can split-borrow them; a draw system
/// typically iterates `ecs` while mutating `draw` through the closure.
pub struct World {
    pub ecs: Ecs<World>,
    pub input: InputState,
    pub draw: DrawContext,
    pub net: NetLink,
    pub modal: Option<ModalSink>,
    stopped: bool,
}

impl World {
    pub fn new(ecs: Ecs<World>, input: InputState, draw: DrawContext, net: NetLink) -> Self {
        Self {
            ecs,
            input,
            draw,
            net,
            modal: None,
            stopped: false,
        }
    }

    /// Run one tick. Returns `false` without doing anything once the
    /// world has shut down, so drivers can stop rescheduling.
    pub fn frame(&mut self, time: Time) -> bool {
        if self.stopped {
            return false;
        }
        self.update(time);
        self.render(time);
        true
    }

    /// Input edge resolution, overlay sweep, then every Update system.
    pub fn update(&mut self, time: Time) {
        self.input.update(time);
        self.draw.collect_texts();
        self.run_phase(Phase::Update, time);
    }

    /// Frame setup, every Draw system, deferred flush, post-process.
    pub fn render(&mut self, time: Time) {
        self.draw.begin_frame();
        self.run_phase(Phase::Draw, time);
        self.draw.flush();
        self.draw.post_process();
    }

    fn run_phase(&mut self, phase: Phase, time: Time) {
        // fn pointers, so the list is cheap to detach from the borrow
        let systems = self.ecs.systems(phase).to_vec();
        for system in systems {
            if let Err(err) = system(self, time) {
                error!(%err, ?phase, "system failed, skipping");
            }
        }
    }

    // --- collaborator surface ---

    /// Install the outbound socket sink. Any messages queued before the
    /// connection are stale and get dropped.
    pub fn init_socket(&mut self, send: Box<dyn FnMut(&str)>) {
        self.net.drain();
        self.net.connect(send);
    }

    /// Feed one raw inbound frame from the socket.
    pub fn enqueue_raw(&mut self, raw: &str) {
        self.net.enqueue_raw(raw);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.input.set_viewport(width, height);
        self.draw.set_viewport(width, height);
    }

    pub fn set_modal_sink(&mut self, sink: ModalSink) {
        self.modal = Some(sink);
    }

    /// One-way stop. Releases backend resources; `frame` is a no-op
    /// afterwards.
    pub fn shutdown(&mut self) {
        self.stopped = true;
        self.draw.release();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuswalk_ecs::EcsError;
    use campuswalk_input::Key;
    use campuswalk_render::{RecordingBackend, ResourceRegistry};

    fn world() -> World {
        let draw = DrawContext::new(
            Box::new(RecordingBackend::new()),
            ResourceRegistry::fully_loaded(),
            1024.0,
            768.0,
        );
        World::new(
            Ecs::new(),
            InputState::new(1024.0, 768.0),
            draw,
            NetLink::new(String::new(), "campus".into()),
        )
    }

    #[derive(Clone)]
    struct Counter(u32);
    impl campuswalk_ecs::Component for Counter {
        const NAME: &'static str = "counter";
    }

    fn count_up(world: &mut World, _time: Time) -> Result<(), EcsError> {
        world.ecs.for_each1(|_, c: &mut Counter| c.0 += 1)
    }

    fn always_fails(_world: &mut World, _time: Time) -> Result<(), EcsError> {
        Err(EcsError::NotAttached("missing"))
    }

    #[test]
    fn failing_system_does_not_stop_the_frame() {
        let mut world = world();
        world.ecs.attach::<Counter>().unwrap();
        world.ecs.register(Phase::Update, always_fails);
        world.ecs.register(Phase::Update, count_up);
        let id = world.ecs.create((Counter(0),)).unwrap();

        assert!(world.frame(Time::default()));
        assert_eq!(world.ecs.read::<Counter>(id).unwrap().unwrap().0, 1);
    }

    #[test]
    fn frame_is_a_noop_after_shutdown() {
        let mut world = world();
        world.ecs.attach::<Counter>().unwrap();
        world.ecs.register(Phase::Update, count_up);
        let id = world.ecs.create((Counter(0),)).unwrap();

        world.shutdown();
        assert!(!world.frame(Time::default()));
        assert_eq!(world.ecs.read::<Counter>(id).unwrap().unwrap().0, 0);
    }

    #[test]
    fn input_edges_resolve_before_systems_run() {
        fn observe(world: &mut World, _time: Time) -> Result<(), EcsError> {
            assert!(world.input.pressed(Key::Use));
            world.ecs.for_each1(|_, c: &mut Counter| c.0 += 1)
        }

        let mut world = world();
        world.ecs.attach::<Counter>().unwrap();
        world.ecs.register(Phase::Update, observe);
        let id = world.ecs.create((Counter(0),)).unwrap();

        world.input.on_key_down(Key::Use);
        world.frame(Time::default());
        // the assert inside the system ran
        assert_eq!(world.ecs.read::<Counter>(id).unwrap().unwrap().0, 1);
    }

    #[test]
    fn init_socket_drops_stale_inbound_messages() {
        let mut world = world();
        world.enqueue_raw(
            r#"{"type":"updateLocation","authToken":"","userId":"x","playerType":"ta",
               "area":"campus","chunk":[0,0],"position":[0.0,0.0],"emotion":"","updateChunk":false}"#,
        );
        assert_eq!(world.net.pending(), 1);
        world.init_socket(Box::new(|_| {}));
        assert_eq!(world.net.pending(), 0);
        assert!(world.net.is_connected());
    }

    #[test]
    fn modal_sink_receives_content() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut world = world();
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = seen.clone();
        world.set_modal_sink(Box::new(move |content| {
            sink.borrow_mut().push(content.to_owned())
        }));
        if let Some(modal) = world.modal.as_mut() {
            modal("welcome");
        }
        assert_eq!(seen.borrow().as_slice(), ["welcome".to_owned()]);
    }
}
