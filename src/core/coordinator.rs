use std::collections::VecDeque;

use super::alerts::composer::NotificationComposer;
use super::alerts::dispatcher::{DispatchReport, NotificationDispatcher};
use super::alerts::model::{AlertKind, NotificationEvent};
use super::alerts::sinks::Sinks;
use super::config::Settings;
use super::lang::{keys, Localization, MessageCatalog};
use super::location::{EntityContext, LocationResolver, WorldMap};
use super::model::{EntityId, EntityKind, Position, SimEvent};
use super::ownership::OwnershipArbiter;
use super::tracker::EntityLifecycleTracker;

/// A notification that reached the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub kind: AlertKind,
    pub text: String,
    pub alert: bool,
    pub report: DispatchReport,
}

#[derive(Debug, Default)]
pub struct CoordinatorOutput {
    pub dispatched: Vec<Dispatched>,
}

/// Spawn-side notification waiting one tick for the host to finish
/// setting the entity up.
#[derive(Debug, Clone)]
struct Deferred {
    entity: EntityId,
    event: NotificationEvent,
}

/// Single ingestion point for simulation events.
///
/// Every event is handled to completion before the next one starts.
/// Deferred notifications from one event always run before the next event
/// is processed.
pub struct Coordinator<L = MessageCatalog> {
    settings: Settings,
    initialized: bool,
    tracker: EntityLifecycleTracker,
    arbiter: OwnershipArbiter,
    resolver: LocationResolver,
    composer: NotificationComposer<L>,
    dispatcher: NotificationDispatcher,
    deferred: VecDeque<Deferred>,
}

impl<L: Localization> Coordinator<L> {
    pub fn new(settings: Settings, sinks: Sinks, arbiter: OwnershipArbiter, lang: L) -> Self {
        Self {
            resolver: LocationResolver::new(WorldMap::default(), settings.world),
            dispatcher: NotificationDispatcher::new(settings.clone(), sinks),
            composer: NotificationComposer::new(lang),
            tracker: EntityLifecycleTracker::new(),
            arbiter,
            settings,
            initialized: false,
            deferred: VecDeque::new(),
        }
    }

    /// Hot-reload settings. Dedup state is kept.
    pub fn update_settings(&mut self, settings: Settings) {
        self.resolver.set_settings(settings.world);
        self.dispatcher.update_settings(settings.clone());
        self.settings = settings;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn tracker(&self) -> &EntityLifecycleTracker {
        &self.tracker
    }

    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Handle one inbound event, after first running whatever the previous
    /// event deferred.
    pub fn handle(&mut self, event: SimEvent) -> CoordinatorOutput {
        let mut output = self.tick();
        if let Some(entity) = event.entity() {
            log::trace!("Event for {:?}", entity);
        }

        match event {
            SimEvent::ServerInitialized { world } => {
                self.resolver.set_map(world);
                self.initialized = true;
                let enabled: Vec<&str> = AlertKind::all()
                    .iter()
                    .filter(|kind| kind.is_enabled(&self.settings.alerts))
                    .map(|kind| kind.display_name())
                    .collect();
                log::info!("World initialized, alerting on: {}", enabled.join(", "));
            }
            SimEvent::EntitySpawned {
                entity,
                kind,
                position,
                destination,
                source_aircraft,
                aboard_cargo_ship,
            } => {
                if !self.initialized {
                    return output;
                }
                match kind {
                    EntityKind::CargoPlane => self.on_aircraft_spawned(entity, position, destination),
                    EntityKind::SupplyDrop => {
                        let ctx = EntityContext { aboard_cargo_ship };
                        self.on_drop_spawned(entity, position, source_aircraft, ctx)
                    }
                    EntityKind::Other(_) => {}
                }
            }
            SimEvent::DropLanded {
                entity,
                position,
                aboard_cargo_ship,
            } => {
                if self.initialized {
                    let ctx = EntityContext { aboard_cargo_ship };
                    if let Some(dispatched) = self.on_drop_landed(entity, position, ctx) {
                        output.dispatched.push(dispatched);
                    }
                }
            }
            SimEvent::EntityDestroyed { entity } => {
                if self.tracker.on_drop_destroyed(entity).is_some() {
                    log::debug!("Released called drop for {:?}", entity);
                }
                if self.tracker.on_aircraft_destroyed(entity).is_some() {
                    log::debug!("Aircraft {:?} left before releasing its drop", entity);
                }
            }
            SimEvent::SupplyCalled { aircraft, player } => {
                self.tracker.register_called_drop(aircraft, player);
            }
        }

        output
    }

    /// Run every deferred notification.
    pub fn tick(&mut self) -> CoordinatorOutput {
        let mut output = CoordinatorOutput::default();
        while let Some(Deferred { entity, mut event }) = self.deferred.pop_front() {
            let (aircraft, drop) = match event.kind {
                AlertKind::CargoPlane => (Some(entity), None),
                _ => (None, Some(entity)),
            };
            event.params.push(self.caller_fragment(aircraft, drop));
            output.dispatched.push(self.send(event));
        }
        output
    }

    fn on_aircraft_spawned(&mut self, aircraft: EntityId, position: Position, destination: Option<Position>) {
        if self.arbiter.is_external_system_active() || self.arbiter.is_externally_managed(aircraft) {
            log::debug!("Aircraft {:?} belongs to another drop system", aircraft);
            return;
        }

        let location = self.location_fragment(keys::LOCATION, position, None);
        let destination = destination
            .map(|pos| self.location_fragment(keys::DESTINATION, pos, None))
            .unwrap_or_default();
        let alert = AlertKind::CargoPlane.is_enabled(&self.settings.alerts);

        self.defer(
            aircraft,
            NotificationEvent::new(AlertKind::CargoPlane, vec![location, destination], alert),
        );
    }

    fn on_drop_spawned(
        &mut self,
        drop: EntityId,
        position: Position,
        source_aircraft: Option<EntityId>,
        ctx: EntityContext,
    ) {
        if let Some(aircraft) = source_aircraft {
            self.tracker.attach_drop(aircraft, drop);
        }
        if !self.tracker.on_drop_spawned(drop) {
            return;
        }

        let location = self.location_fragment(keys::LOCATION, position, Some(&ctx));
        let alert = AlertKind::SupplyDrop.is_enabled(&self.settings.alerts);
        self.defer(
            drop,
            NotificationEvent::new(AlertKind::SupplyDrop, vec![location], alert),
        );
    }

    fn on_drop_landed(&mut self, drop: EntityId, position: Position, ctx: EntityContext) -> Option<Dispatched> {
        if !self.tracker.on_drop_landed(drop) {
            return None;
        }

        let misc = &self.settings.misc;
        let hidden = self.arbiter.should_hide_landed_alert(
            self.tracker.lookup_called_drop(None, Some(drop)),
            misc.hide_called_supply,
            misc.hide_random_supply,
        );
        if hidden {
            log::debug!("Landed alert for {:?} left to another drop system", drop);
        }

        let location = self.location_fragment(keys::LOCATION, position, Some(&ctx));
        let caller = self.caller_fragment(None, Some(drop));
        let alert = AlertKind::SupplyDropLanded.is_enabled(&self.settings.alerts) && !hidden;

        Some(self.send(NotificationEvent::new(
            AlertKind::SupplyDropLanded,
            vec![location, caller],
            alert,
        )))
    }

    fn defer(&mut self, entity: EntityId, event: NotificationEvent) {
        self.deferred.push_back(Deferred { entity, event });
    }

    fn send(&self, event: NotificationEvent) -> Dispatched {
        let text = self.composer.compose(event.key, &event.params);
        log::debug!("{} (alert: {}): {}", event.kind.display_name(), event.alert, text);
        let report = self.dispatcher.dispatch(&self.composer, &text, event.alert);
        Dispatched {
            kind: event.kind,
            text,
            alert: event.alert,
            report,
        }
    }

    fn location_fragment(&self, key: &str, pos: Position, ctx: Option<&EntityContext>) -> String {
        let label = self.resolver.resolve(pos, ctx, false);
        self.composer.fragment(key, &label)
    }

    fn caller_fragment(&self, aircraft: Option<EntityId>, drop: Option<EntityId>) -> String {
        if !self.settings.misc.show_supply_player {
            return String::new();
        }
        self.tracker
            .lookup_called_drop(aircraft, drop)
            .and_then(|called| called.player.as_ref())
            .map(|player| self.composer.fragment(keys::SUPPLY_DROP_PLAYER, &player.name))
            .unwrap_or_default()
    }
}
