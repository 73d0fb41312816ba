//! Headless app helpers shared by the integration tests.
#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use coop_shooter::character::{
    spawn_character, ActionKind, CharacterAction, CharacterConfig, CharacterNetIds, CharacterSpawn,
};
use coop_shooter::combat::{CombatSet, RayHit, TraceRequest, TraceResult, WeaponRng};
use coop_shooter::core::{GameState, SurfaceKind};
use coop_shooter::data::WeaponDefinition;
use coop_shooter::net::{
    ClientInbox, ClientOutbox, ConnectedPeers, NetMode, PeerId, ServerInbox, ServerOutbox,
};
use coop_shooter::CoopGamePlugin;

pub const FRAME: Duration = Duration::from_millis(10);

/// What the scripted ray-cast backend reports for every trace.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ScriptedTrace {
    /// Entity every trace hits, unless the trace ignores it
    pub target: Option<Entity>,
    pub distance: f32,
    pub surface: SurfaceKind,
}

/// Every trace request the backend answered.
#[derive(Resource, Debug, Default)]
pub struct TraceLog(pub Vec<TraceRequest>);

fn answer_scripted_traces(
    script: Res<ScriptedTrace>,
    mut log: ResMut<TraceLog>,
    mut requests: EventReader<TraceRequest>,
    mut results: EventWriter<TraceResult>,
) {
    for request in requests.read() {
        log.0.push(request.clone());

        let hit = script
            .target
            .filter(|target| !request.ignores(*target))
            .map(|entity| RayHit {
                entity,
                point: request.origin + request.direction * script.distance,
                distance: script.distance,
                surface: script.surface,
            });

        results.send(TraceResult {
            request: request.clone(),
            hit,
        });
    }
}

/// Events of one type seen so far.
#[derive(Resource)]
pub struct Collected<E: Event>(pub Vec<E>);

fn collect<E: Event + Clone>(mut reader: EventReader<E>, mut collected: ResMut<Collected<E>>) {
    collected.0.extend(reader.read().cloned());
}

pub fn collect_events<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Collected::<E>(Vec::new()))
        .add_systems(Last, collect::<E>);
}

pub fn collected<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Collected<E>>().0.clone()
}

/// Headless game app in the given mode, already in game.
pub fn headless_app(mode: NetMode) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_plugins(CoopGamePlugin { mode })
        .init_resource::<ScriptedTrace>()
        .init_resource::<TraceLog>()
        .add_systems(Update, answer_scripted_traces.in_set(CombatSet::Trace));

    // Startup, then the transition into the game
    app.update();
    app.update();
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );

    app.insert_resource(WeaponRng::seeded(7));
    app
}

/// Options for spawning a test character.
#[derive(Debug, Clone)]
pub struct TestCharacter {
    pub position: Vec3,
    pub weapon: WeaponDefinition,
    pub owner: Option<PeerId>,
    pub locally_controlled: bool,
    pub net_ids: Option<CharacterNetIds>,
}

impl Default for TestCharacter {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            weapon: WeaponDefinition::default(),
            owner: Some(PeerId::HOST),
            locally_controlled: true,
            net_ids: None,
        }
    }
}

/// Spawn a character and return (character, weapon).
pub fn spawn(app: &mut App, options: TestCharacter) -> (Entity, Entity) {
    let mode = *app.world().resource::<NetMode>();
    let config = app.world().resource::<CharacterConfig>().clone();

    let world = app.world_mut();
    let entities = {
        let mut commands = world.commands();
        spawn_character(
            &mut commands,
            CharacterSpawn {
                position: options.position,
                yaw: 0.0,
                weapon: &options.weapon,
                config: &config,
                mode,
                owner: options.owner,
                locally_controlled: options.locally_controlled,
                net_ids: options.net_ids,
            },
        )
    };
    world.flush();
    entities
}

pub fn act(app: &mut App, character: Entity, action: ActionKind) {
    app.world_mut()
        .send_event(CharacterAction::new(character, action));
}

pub fn aim_at(app: &mut App, target: Entity, distance: f32, surface: SurfaceKind) {
    app.insert_resource(ScriptedTrace {
        target: Some(target),
        distance,
        surface,
    });
}

pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// A server app and a client app, with messages carried between their
/// queues after every frame.
pub struct ServerClientStepper {
    pub server: App,
    pub client: App,
    /// Peer id the server knows the client by
    pub client_peer: PeerId,
}

impl ServerClientStepper {
    pub fn new(server_mode: NetMode, client_peer: PeerId) -> Self {
        let mut server = headless_app(server_mode);
        server
            .world_mut()
            .resource_mut::<ConnectedPeers>()
            .connect(client_peer);
        let client = headless_app(NetMode::Client);

        Self {
            server,
            client,
            client_peer,
        }
    }

    /// Deliver everything queued so far. Messages from other peers addressed
    /// elsewhere are dropped.
    pub fn deliver(&mut self) {
        let requests = self.client.world_mut().resource_mut::<ClientOutbox>().drain();
        let mut inbox = self.server.world_mut().resource_mut::<ServerInbox>();
        for message in requests {
            inbox.push(self.client_peer, message);
        }

        let replication = self.server.world_mut().resource_mut::<ServerOutbox>().drain();
        let mut inbox = self.client.world_mut().resource_mut::<ClientInbox>();
        for (peer, message) in replication {
            if peer == self.client_peer {
                inbox.push(message);
            }
        }
    }

    /// Client frame, delivery, server frame, delivery.
    pub fn frame_step(&mut self) {
        self.client.update();
        self.deliver();
        self.server.update();
        self.deliver();
    }

    pub fn frame_steps(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame_step();
        }
    }
}
