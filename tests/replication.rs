//! Listen server and client exchanging fire requests and shot records.

mod common;

use bevy::prelude::*;

use common::*;
use coop_shooter::character::{ActionKind, CharacterNetIds, Died};
use coop_shooter::combat::{
    Ammo, FireEffectEvent, FireRejection, FireRequestRejected, FireValidation, Health,
    ImpactEffectEvent, ReplicatedShot, RequireOwnership,
};
use coop_shooter::core::{DeathEvent, Lifespan, SurfaceKind};
use coop_shooter::net::{
    AimSnapshot, ClientMessage, ClientOutbox, NetId, NetMode, NetRole, PeerId, ServerInbox,
    ServerMessage, ServerOutbox,
};

const CLIENT_PEER: PeerId = PeerId(1);

const HOST_IDS: CharacterNetIds = CharacterNetIds {
    character: NetId(1),
    weapon: NetId(2),
};
const REMOTE_IDS: CharacterNetIds = CharacterNetIds {
    character: NetId(3),
    weapon: NetId(4),
};
const DUMMY_IDS: CharacterNetIds = CharacterNetIds {
    character: NetId(5),
    weapon: NetId(6),
};

/// A character as seen by both processes: (character, weapon).
struct Mirrored {
    server: (Entity, Entity),
    client: (Entity, Entity),
}

struct Session {
    stepper: ServerClientStepper,
    host: Mirrored,
    remote: Mirrored,
    dummy: Mirrored,
}

/// Listen server with a host player, one remote player, and a dummy.
fn session() -> Session {
    let mut stepper = ServerClientStepper::new(NetMode::ListenServer, CLIENT_PEER);

    let mut mirrored = |owner: Option<PeerId>, ids: CharacterNetIds, position: Vec3| Mirrored {
        server: spawn(
            &mut stepper.server,
            TestCharacter {
                position,
                owner,
                locally_controlled: owner == Some(PeerId::HOST),
                net_ids: Some(ids),
                ..default()
            },
        ),
        client: spawn(
            &mut stepper.client,
            TestCharacter {
                position,
                owner,
                locally_controlled: owner == Some(CLIENT_PEER),
                net_ids: Some(ids),
                ..default()
            },
        ),
    };

    let host = mirrored(Some(PeerId::HOST), HOST_IDS, Vec3::ZERO);
    let remote = mirrored(Some(CLIENT_PEER), REMOTE_IDS, Vec3::new(3.0, 0.0, 0.0));
    let dummy = mirrored(None, DUMMY_IDS, Vec3::new(0.0, 0.0, -10.0));

    // Register the spawned entities on both sides
    stepper.frame_steps(2);

    Session {
        stepper,
        host,
        remote,
        dummy,
    }
}

fn ammo(app: &App, weapon: Entity) -> u32 {
    app.world().get::<Ammo>(weapon).unwrap().current
}

fn traces(app: &App) -> usize {
    app.world().resource::<TraceLog>().0.len()
}

#[test]
fn roles_follow_the_process() {
    let s = session();
    let server = s.stepper.server.world();
    let client = s.stepper.client.world();

    assert_eq!(server.get::<NetRole>(s.remote.server.1), Some(&NetRole::Authority));
    assert_eq!(client.get::<NetRole>(s.remote.client.1), Some(&NetRole::AutonomousProxy));
    assert_eq!(client.get::<NetRole>(s.host.client.1), Some(&NetRole::SimulatedProxy));
}

#[test]
fn client_fire_is_resolved_by_the_server() {
    let mut s = session();
    aim_at(&mut s.stepper.server, s.dummy.server.0, 10.0, SurfaceKind::FleshDefault);

    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StartFire);
    s.stepper.frame_step();
    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StopFire);
    s.stepper.frame_steps(3);

    let server = &s.stepper.server;
    assert_eq!(traces(server), 1);
    assert_eq!(ammo(server, s.remote.server.1), 29);
    assert_eq!(server.world().get::<Health>(s.dummy.server.0).unwrap().current, 80.0);
    assert_eq!(server.world().get::<ReplicatedShot>(s.remote.server.1).unwrap().version, 1);

    // The requesting client never casts or applies damage itself
    let client = &s.stepper.client;
    assert_eq!(traces(client), 0);
    assert_eq!(client.world().get::<Health>(s.dummy.client.0).unwrap().current, 100.0);
}

#[test]
fn owner_gets_ammo_but_not_its_own_shot_record() {
    let mut s = session();
    collect_events::<FireEffectEvent>(&mut s.stepper.client);

    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StartFire);
    s.stepper.frame_steps(25);
    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StopFire);
    s.stepper.frame_steps(3);

    assert_eq!(ammo(&s.stepper.server, s.remote.server.1), 27);
    assert_eq!(ammo(&s.stepper.client, s.remote.client.1), 27);

    let client = s.stepper.client.world();
    assert_eq!(client.get::<ReplicatedShot>(s.remote.client.1).unwrap().version, 0);
    assert!(collected::<FireEffectEvent>(&s.stepper.client).is_empty());
}

#[test]
fn observers_replay_shot_cosmetics() {
    let mut s = session();
    collect_events::<FireEffectEvent>(&mut s.stepper.client);
    collect_events::<ImpactEffectEvent>(&mut s.stepper.client);
    aim_at(&mut s.stepper.server, s.dummy.server.0, 10.0, SurfaceKind::FleshDefault);

    act(&mut s.stepper.server, s.host.server.0, ActionKind::StartFire);
    s.stepper.frame_step();
    act(&mut s.stepper.server, s.host.server.0, ActionKind::StopFire);
    s.stepper.frame_steps(3);

    let authority = *s.stepper.server.world().get::<ReplicatedShot>(s.host.server.1).unwrap();
    let observed = *s.stepper.client.world().get::<ReplicatedShot>(s.host.client.1).unwrap();
    assert_eq!(authority.version, 1);
    assert_eq!(observed.version, 1);
    assert_eq!(observed.record, authority.record);

    let fire = collected::<FireEffectEvent>(&s.stepper.client);
    assert_eq!(fire.len(), 1);
    assert_eq!(fire[0].weapon, s.host.client.1);
    assert_eq!(fire[0].trace_end, authority.record.end_point());
    assert!(!fire[0].shake_camera);

    let impacts = collected::<ImpactEffectEvent>(&s.stepper.client);
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].surface, SurfaceKind::FleshDefault);

    // Cosmetics only: the observer applies no damage
    assert_eq!(traces(&s.stepper.client), 0);
    let dummy_health = s.stepper.client.world().get::<Health>(s.dummy.client.0).unwrap().current;
    assert_eq!(dummy_health, 100.0);
}

#[test]
fn reload_is_forwarded_to_the_server() {
    let mut s = session();

    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StartFire);
    s.stepper.frame_steps(15);
    act(&mut s.stepper.client, s.remote.client.0, ActionKind::StopFire);
    s.stepper.frame_steps(3);
    assert_eq!(ammo(&s.stepper.client, s.remote.client.1), 28);

    act(&mut s.stepper.client, s.remote.client.0, ActionKind::BeginReload);
    s.stepper.frame_steps(3);

    assert_eq!(ammo(&s.stepper.server, s.remote.server.1), 30);
    assert_eq!(ammo(&s.stepper.client, s.remote.client.1), 30);
}

#[test]
fn validator_rejects_requests_for_other_players_weapons() {
    let mut s = session();
    collect_events::<FireRequestRejected>(&mut s.stepper.server);
    s.stepper
        .server
        .insert_resource(FireValidation::new(RequireOwnership));

    let request = |weapon| ClientMessage::Fire {
        weapon,
        stance: default(),
        aim: AimSnapshot::default(),
    };
    {
        let mut inbox = s.stepper.server.world_mut().resource_mut::<ServerInbox>();
        inbox.push(CLIENT_PEER, request(HOST_IDS.weapon));
        inbox.push(CLIENT_PEER, request(REMOTE_IDS.weapon));
    }
    s.stepper.server.update();

    let rejected = collected::<FireRequestRejected>(&s.stepper.server);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].peer, CLIENT_PEER);
    assert_eq!(
        rejected[0].reason,
        FireRejection::NotOwner {
            peer: CLIENT_PEER,
            weapon: HOST_IDS.weapon,
        }
    );

    // Only the client's own weapon fired
    assert_eq!(traces(&s.stepper.server), 1);
    assert_eq!(ammo(&s.stepper.server, s.host.server.1), 30);
    assert_eq!(ammo(&s.stepper.server, s.remote.server.1), 29);
}

#[test]
fn unknown_weapons_are_rejected() {
    let mut s = session();
    collect_events::<FireRequestRejected>(&mut s.stepper.server);

    s.stepper
        .server
        .world_mut()
        .resource_mut::<ServerInbox>()
        .push(
            CLIENT_PEER,
            ClientMessage::Fire {
                weapon: NetId(99),
                stance: default(),
                aim: AimSnapshot::default(),
            },
        );
    s.stepper.server.update();

    let rejected = collected::<FireRequestRejected>(&s.stepper.server);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].reason, FireRejection::UnknownWeapon(NetId(99)));
    assert_eq!(traces(&s.stepper.server), 0);
}

#[test]
fn deaths_reach_the_client() {
    let mut s = session();
    aim_at(&mut s.stepper.server, s.dummy.server.0, 10.0, SurfaceKind::FleshVulnerable);

    // Three headshots at 40 damage
    act(&mut s.stepper.server, s.host.server.0, ActionKind::StartFire);
    s.stepper.frame_steps(25);
    act(&mut s.stepper.server, s.host.server.0, ActionKind::StopFire);
    s.stepper.frame_steps(3);

    let server = s.stepper.server.world();
    assert_eq!(server.get::<Health>(s.dummy.server.0).unwrap().current, 0.0);
    assert!(server.get::<Died>(s.dummy.server.0).unwrap().0);

    let client = s.stepper.client.world();
    assert!(client.get::<Died>(s.dummy.client.0).unwrap().0);
    assert!(client.get::<Lifespan>(s.dummy.client.0).is_some());
}

#[test]
fn client_release_and_press_cannot_beat_the_rate() {
    let mut client = headless_app(NetMode::Client);
    let (shooter, _) = spawn(
        &mut client,
        TestCharacter {
            owner: Some(CLIENT_PEER),
            net_ids: Some(REMOTE_IDS),
            ..default()
        },
    );

    for _ in 0..5 {
        act(&mut client, shooter, ActionKind::StartFire);
        client.update();
        act(&mut client, shooter, ActionKind::StopFire);
        step(&mut client, 2);
    }

    // 150 ms at 600 RPM leaves room for two requests
    let outbox = client.world().resource::<ClientOutbox>();
    let requests = outbox
        .messages()
        .iter()
        .filter(|message| matches!(message, ClientMessage::Fire { .. }))
        .count();
    assert_eq!(requests, 2);
    assert_eq!(traces(&client), 0);
}

#[test]
fn requests_from_dead_characters_are_ignored() {
    let mut s = session();
    aim_at(&mut s.stepper.server, s.dummy.server.0, 10.0, SurfaceKind::FleshDefault);

    s.stepper.server.world_mut().send_event(DeathEvent {
        entity: s.remote.server.0,
        killed_by: None,
    });
    s.stepper.server.update();
    assert!(s.stepper.server.world().get::<Died>(s.remote.server.0).unwrap().0);

    s.stepper
        .server
        .world_mut()
        .resource_mut::<ServerInbox>()
        .push(
            CLIENT_PEER,
            ClientMessage::Fire {
                weapon: REMOTE_IDS.weapon,
                stance: default(),
                aim: AimSnapshot::default(),
            },
        );
    s.stepper.server.update();

    let server = &s.stepper.server;
    assert_eq!(traces(server), 0);
    assert_eq!(ammo(server, s.remote.server.1), 30);
    assert_eq!(server.world().get::<Health>(s.dummy.server.0).unwrap().current, 100.0);

    let outbox = server.world().resource::<ServerOutbox>();
    assert!(!outbox
        .messages()
        .iter()
        .any(|(_, message)| matches!(message, ServerMessage::ShotRecord { .. })));
}
