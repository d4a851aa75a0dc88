//! The game session: one isolated instance of the game.
//!
//! `GameSession` owns its players, the phase machine, and the round's
//! pending-action table. Every mutating operation returns the batch of
//! `(Scope, Outbound)` pairs the transport layer should fan out; errors
//! leave state untouched and describe what the issuing player did wrong.
//!
//! The struct itself is synchronous and single-threaded — the actor in
//! [`crate::actor`] serializes access to it, which is what makes phase
//! transitions and resolution linearizable per session.

use darkgrid_protocol::{
    ActionKind, ActionOutcome, Faction, GameCode, Outbound, Phase,
    PlayerStatus, Role, Scope, SessionView, Step, Threat, is_command,
    parse_command,
};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::resolve::{ActionRecord, ActionTable, resolve};
use crate::{GameConfig, Player, SessionError, router};

/// A batch of routed outbound payloads produced by one operation.
pub type Batch = Vec<(Scope, Outbound)>;

/// One isolated game instance, keyed by its session code.
#[derive(Debug)]
pub struct GameSession {
    code: GameCode,
    config: GameConfig,
    phase: Phase,
    /// Join order is preserved; players are never removed.
    players: Vec<Player>,
    pending: ActionTable,
}

impl GameSession {
    pub fn new(code: GameCode, config: GameConfig) -> Self {
        Self {
            code,
            config: config.validated(),
            phase: Phase::Waiting,
            players: Vec::new(),
            pending: ActionTable::default(),
        }
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn pending_actions(&self) -> &ActionTable {
        &self.pending
    }

    // -- Join ---------------------------------------------------------------

    /// Adds a player while the session is waiting.
    ///
    /// # Errors
    /// `InvalidTransition` after start, `DuplicateIdentity` if the name is
    /// taken, `SessionFull` at the configured limit.
    pub fn join(
        &mut self,
        name: &str,
        alias: &str,
    ) -> Result<Batch, SessionError> {
        if !self.phase.is_joinable() {
            return Err(SessionError::InvalidTransition { phase: self.phase });
        }
        if self.index_of(name).is_some() {
            return Err(SessionError::DuplicateIdentity(name.to_string()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(SessionError::SessionFull(self.code.clone()));
        }

        self.players.push(Player::new(name, alias));
        tracing::info!(
            code = %self.code,
            player = name,
            players = self.players.len(),
            "player joined"
        );

        Ok(vec![(
            router::announce_to(&self.code),
            Outbound::notice(format!("{alias} joined the game")),
        )])
    }

    // -- Start --------------------------------------------------------------

    /// Deals roles and opens round 1.
    ///
    /// The role deck is built from the configured ratios, shuffled with
    /// `rng`, and dealt in join order.
    ///
    /// # Errors
    /// `InvalidTransition` outside `Waiting`, `NotEnoughPlayers` below the
    /// configured minimum.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Batch, SessionError> {
        if !self.phase.is_joinable() {
            return Err(SessionError::InvalidTransition { phase: self.phase });
        }
        let n = self.players.len();
        if n < self.config.min_players {
            return Err(SessionError::NotEnoughPlayers {
                have: n,
                need: self.config.min_players,
            });
        }

        let counts = self.config.role_counts(n);
        let mut deck = Vec::with_capacity(n);
        deck.extend(std::iter::repeat_n(Role::Hacker, counts.hackers));
        deck.extend(std::iter::repeat_n(Role::Whitehat, counts.whitehats));
        deck.extend(std::iter::repeat_n(Role::Analyst, counts.analysts));
        deck.extend(std::iter::repeat_n(Role::User, n - deck.len()));
        deck.shuffle(rng);

        for (player, role) in self.players.iter_mut().zip(deck) {
            player.role = Some(role);
        }

        self.phase = Phase::Active {
            round: 1,
            step: Step::NightAction,
        };
        tracing::info!(
            code = %self.code,
            players = n,
            hackers = counts.hackers,
            "game started"
        );

        let mut batch: Batch =
            vec![(router::announce_to(&self.code), Outbound::GameStarted)];
        for player in &self.players {
            let role =
                player.role.expect("roles were dealt to every player above");
            batch.push((
                router::reply_to(&player.name),
                Outbound::RoleAssigned { role },
            ));
        }
        batch.push((
            router::announce_to(&self.code),
            Outbound::PhaseChanged {
                round: 1,
                step: Step::NightAction,
            },
        ));
        Ok(batch)
    }

    // -- Night actions ------------------------------------------------------

    /// Records a night action for the current round.
    ///
    /// At most one record per issuer per round; a resubmission overwrites
    /// the earlier one. Scans are read-only and answered immediately;
    /// attacks and protections resolve when the round does.
    ///
    /// # Errors
    /// `WrongPhase` outside `NightAction`, `NotAuthorized` if the issuer
    /// is offline or the kind doesn't match their role, `InvalidTarget`
    /// for self, offline, or unknown targets.
    pub fn submit_action(
        &mut self,
        name: &str,
        kind: ActionKind,
        target: &str,
    ) -> Result<Batch, SessionError> {
        let issuer_idx = self
            .index_of(name)
            .ok_or_else(|| SessionError::UnknownPlayer(name.to_string()))?;
        let round = match self.phase {
            Phase::Active {
                round,
                step: Step::NightAction,
            } => round,
            _ => return Err(SessionError::WrongPhase),
        };

        let issuer = &self.players[issuer_idx];
        if !issuer.is_online() || issuer.role != Some(kind.role()) {
            return Err(SessionError::NotAuthorized);
        }
        if name == target {
            return Err(SessionError::InvalidTarget(
                "you cannot target yourself".to_string(),
            ));
        }
        let target_idx = self
            .index_of(target)
            .ok_or_else(|| SessionError::InvalidTarget(target.to_string()))?;
        if !self.players[target_idx].is_online() {
            return Err(SessionError::InvalidTarget(format!(
                "{target} is offline"
            )));
        }

        self.pending.record(ActionRecord {
            issuer: name.to_string(),
            kind,
            target: target.to_string(),
            round,
        });
        tracing::debug!(
            code = %self.code,
            player = name,
            %kind,
            target,
            round,
            "action recorded"
        );

        if kind == ActionKind::Scan {
            let role = self.players[target_idx]
                .role
                .expect("roles are dealt while a round is active");
            let threat = Threat::of(role);
            self.players[issuer_idx]
                .intel
                .insert(target.to_string(), threat);
            Ok(vec![(
                router::reply_to(name),
                Outbound::ScanResult {
                    target: target.to_string(),
                    threat,
                },
            )])
        } else {
            Ok(vec![(
                router::reply_to(name),
                Outbound::notice(format!(
                    "{kind} on {target} recorded for round {round}"
                )),
            )])
        }
    }

    // -- Chat ---------------------------------------------------------------

    /// Handles a chat line from a player.
    ///
    /// Illegitimate chat attempts (offline sender, wrong step, bad
    /// command) never hard-error: they come back as a unicast system
    /// notice to the sender, mirroring what the client shows in-band.
    ///
    /// # Errors
    /// Only `UnknownPlayer` — the sender must be a member.
    pub fn chat(
        &mut self,
        name: &str,
        text: &str,
    ) -> Result<Batch, SessionError> {
        let sender_idx = self
            .index_of(name)
            .ok_or_else(|| SessionError::UnknownPlayer(name.to_string()))?;

        if !self.players[sender_idx].is_online() {
            return Ok(vec![(
                router::reply_to(name),
                Outbound::notice("You are offline. Better luck next time."),
            )]);
        }

        if is_command(text) {
            return Ok(self.run_command(name, text));
        }

        let sender = &self.players[sender_idx];
        match router::chat_route(&self.phase, &self.code, sender) {
            Some((scope, label)) => {
                tracing::debug!(
                    code = %self.code,
                    player = name,
                    %scope,
                    "chat routed"
                );
                Ok(vec![(
                    scope,
                    Outbound::Chat {
                        sender: label,
                        text: text.to_string(),
                    },
                )])
            }
            None => Ok(vec![(
                router::reply_to(name),
                Outbound::notice("You cannot chat at this point in time."),
            )]),
        }
    }

    /// Parses and runs a `/command`, turning every failure into a unicast
    /// notice to the issuer.
    fn run_command(&mut self, name: &str, text: &str) -> Batch {
        let command = match parse_command(text) {
            Ok(command) => command,
            Err(e) => {
                return vec![(
                    router::reply_to(name),
                    Outbound::notice(e.to_string()),
                )];
            }
        };

        // Command arguments are aliases (what players see on screen);
        // resolve to the first matching identity in join order.
        let Some(target) = self.find_by_alias(&command.alias) else {
            return vec![(
                router::reply_to(name),
                Outbound::notice(
                    SessionError::InvalidTarget(format!(
                        "no player with alias {}",
                        command.alias
                    ))
                    .to_string(),
                ),
            )];
        };

        let target_name = target.name.clone();
        match self.submit_action(name, command.kind, &target_name) {
            Ok(batch) => batch,
            Err(e) => vec![(
                router::reply_to(name),
                Outbound::notice(e.to_string()),
            )],
        }
    }

    // -- Phase advancement --------------------------------------------------

    /// Moves the session one step along the round cycle.
    ///
    /// `NightAction → Resolution` consumes and resolves the action table;
    /// `Resolution → Day` first evaluates the win condition and
    /// short-circuits to `Ended`; `Day → NightAction` opens the next
    /// round. Driven by an external timer, never by the core blocking on
    /// a clock.
    ///
    /// # Errors
    /// `InvalidTransition` in `Waiting` or `Ended`.
    pub fn advance(&mut self) -> Result<Batch, SessionError> {
        match self.phase {
            Phase::Waiting | Phase::Ended { .. } => {
                Err(SessionError::InvalidTransition { phase: self.phase })
            }
            Phase::Active {
                round,
                step: Step::NightAction,
            } => Ok(self.enter_resolution(round)),
            Phase::Active {
                round,
                step: Step::Resolution,
            } => Ok(self.leave_resolution(round)),
            Phase::Active {
                round,
                step: Step::Day,
            } => Ok(self.open_round(round + 1)),
        }
    }

    /// Resolves the round's actions. The table is consumed, so advancing
    /// through another resolution with no new submissions is a no-op on
    /// player state.
    fn enter_resolution(&mut self, round: u32) -> Batch {
        self.phase = Phase::Active {
            round,
            step: Step::Resolution,
        };
        let report = resolve(&self.pending, &self.players);
        self.pending.clear();

        let mut batch: Batch = vec![(
            router::announce_to(&self.code),
            Outbound::PhaseChanged {
                round,
                step: Step::Resolution,
            },
        )];

        for action in &report.actions {
            if action.kind == ActionKind::Target
                && action.outcome != ActionOutcome::AlreadyResolved
            {
                if let Some(target) = self.player_mut(&action.target) {
                    target.last_outcome = Some(action.outcome);
                }
            }
            batch.push((
                router::reply_to(&action.issuer),
                Outbound::ActionResult {
                    kind: action.kind,
                    target: action.target.clone(),
                    outcome: action.outcome,
                },
            ));
        }

        for name in &report.eliminated {
            let Some(player) = self.player_mut(name) else {
                continue;
            };
            player.status = PlayerStatus::Offline;
            let alias = player.alias.clone();
            tracing::info!(
                code = %self.code,
                player = name.as_str(),
                "player eliminated"
            );
            batch.push((
                router::announce_to(&self.code),
                Outbound::Eliminated {
                    name: name.clone(),
                    alias,
                },
            ));
        }

        batch
    }

    /// Evaluates the win condition and moves to `Day` or `Ended`.
    fn leave_resolution(&mut self, round: u32) -> Batch {
        if let Some(winner) = self.winner() {
            self.phase = Phase::Ended { winner };
            tracing::info!(code = %self.code, %winner, round, "game ended");
            return vec![(
                router::announce_to(&self.code),
                Outbound::GameEnded { winner },
            )];
        }

        self.phase = Phase::Active {
            round,
            step: Step::Day,
        };
        vec![(
            router::announce_to(&self.code),
            Outbound::PhaseChanged {
                round,
                step: Step::Day,
            },
        )]
    }

    /// Opens a new round: night step, empty action table.
    fn open_round(&mut self, round: u32) -> Batch {
        self.pending.clear();
        self.phase = Phase::Active {
            round,
            step: Step::NightAction,
        };
        tracing::info!(code = %self.code, round, "round opened");
        vec![(
            router::announce_to(&self.code),
            Outbound::PhaseChanged {
                round,
                step: Step::NightAction,
            },
        )]
    }

    /// The winning faction, if the game is decided: users win once no
    /// hacker is online, hackers win once they match or outnumber the
    /// remaining non-hackers.
    fn winner(&self) -> Option<Faction> {
        let online =
            |role_is_hacker: bool| {
                self.players
                    .iter()
                    .filter(|p| {
                        p.is_online()
                            && p.role.is_some()
                            && (p.role == Some(Role::Hacker)) == role_is_hacker
                    })
                    .count()
            };
        let hackers = online(true);
        let others = online(false);

        if hackers == 0 {
            Some(Faction::Users)
        } else if hackers >= others {
            Some(Faction::Hackers)
        } else {
            None
        }
    }

    // -- Snapshot and disconnect --------------------------------------------

    /// A read-only projection of the session for one viewer: own record
    /// in full, everyone else redacted to public fields plus the viewer's
    /// scan intel.
    pub fn snapshot(&self, viewer: &str) -> Result<SessionView, SessionError> {
        let viewer_idx = self
            .index_of(viewer)
            .ok_or_else(|| SessionError::UnknownPlayer(viewer.to_string()))?;
        let viewer = &self.players[viewer_idx];
        Ok(SessionView {
            code: self.code.clone(),
            phase: self.phase,
            players: self.players.iter().map(|p| p.view_for(viewer)).collect(),
        })
    }

    /// Marks a player offline immediately. Role and prior action records
    /// are retained so resolution stays consistent.
    pub fn disconnect(&mut self, name: &str) -> Result<Batch, SessionError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| SessionError::UnknownPlayer(name.to_string()))?;
        if !self.players[idx].is_online() {
            return Ok(Vec::new());
        }
        self.players[idx].status = PlayerStatus::Offline;
        let alias = self.players[idx].alias.clone();
        tracing::info!(code = %self.code, player = name, "player disconnected");
        Ok(vec![(
            router::announce_to(&self.code),
            Outbound::notice(format!("{alias} went offline")),
        )])
    }

    // -- Lookup helpers -----------------------------------------------------

    fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// First player (in join order) carrying this alias. Aliases are not
    /// unique, so earlier joiners shadow later ones for command targets.
    pub fn find_by_alias(&self, alias: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.alias == alias)
    }
}

// =========================================================================
// Tests
// =========================================================================
