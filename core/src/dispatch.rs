//! Interpreter — owns the command tables, the scenario timeline and the
//! pending queue, and drains the queue one line at a time.
//!
//! Each line goes through the same steps: split into tokens, resolve an
//! implicit vehicle target, resolve the command name (synonym, registry,
//! extension prefix), check arity, coerce, invoke and report. A failure at
//! any step is reported through the world's feedback sink and only ends
//! that line; the drain pass always runs to an empty queue.

use tracing::{debug, info};

use crate::args::{coerce, Args};
use crate::builtins::register_builtins;
use crate::command::{CommandContext, CommandResult, CommandSpec};
use crate::error::{CommandError, ScenarioError};
use crate::extension::{Extension, ExtensionRequest, ExtensionRouter};
use crate::help::help_text;
use crate::queue::PendingQueue;
use crate::registry::{CommandRegistry, SynonymTable};
use crate::scenario::{LoadReport, ScenarioScheduler};
use crate::settings::StackSettings;
use crate::tokenize::{remainder, split_tokens};
use crate::world::World;

/// Command name used for the implicit status request (`KL204` alone).
const STATUS_COMMAND: &str = "POS";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How one queued line ended.
#[derive(Debug)]
pub enum Outcome {
    /// A registered command ran and returned this result.
    Done(CommandResult),
    /// The line was handed to the extension registered under `prefix`.
    Extension { prefix: String },
    /// The line stopped before (or instead of) running a handler.
    Failed(CommandError),
    /// Blank segment.
    Skipped,
}

impl Outcome {
    /// Whether the handler (or extension) ran and did not report failure.
    pub fn is_ok(&self) -> bool {
        match self {
            Outcome::Done(result) => result.ok,
            Outcome::Extension { .. } | Outcome::Skipped => true,
            Outcome::Failed(_) => false,
        }
    }
}

#[derive(Debug)]
pub struct LineOutcome {
    pub line: String,
    pub status: Outcome,
}

// ---------------------------------------------------------------------------
// InterpreterBuilder
// ---------------------------------------------------------------------------

/// Collects commands, synonyms and extensions; they are fixed once
/// [`build`](InterpreterBuilder::build) is called.
pub struct InterpreterBuilder {
    settings: StackSettings,
    registry: CommandRegistry,
    synonyms: SynonymTable,
    extensions: ExtensionRouter,
}

impl InterpreterBuilder {
    pub fn new(settings: StackSettings) -> Self {
        let extensions = ExtensionRouter::new(settings.extension_prefix_len);
        InterpreterBuilder {
            settings,
            registry: CommandRegistry::new(),
            synonyms: SynonymTable::new(),
            extensions,
        }
    }

    /// Add the built-in command table and its synonyms.
    pub fn with_builtins(mut self) -> Result<Self, CommandError> {
        register_builtins(&mut self.registry, &mut self.synonyms)?;
        Ok(self)
    }

    pub fn command(mut self, spec: CommandSpec) -> Result<Self, CommandError> {
        self.registry.register(spec)?;
        Ok(self)
    }

    pub fn synonym(mut self, alias: &str, target: &str) -> Result<Self, CommandError> {
        self.synonyms.insert(alias, target)?;
        Ok(self)
    }

    pub fn extension(mut self, prefix: &str, extension: Box<dyn Extension>) -> Result<Self, CommandError> {
        self.extensions.register(prefix, extension)?;
        Ok(self)
    }

    /// Build the interpreter and stack the configured start commands.
    pub fn build(self) -> Interpreter {
        let mut queue = PendingQueue::new();
        for line in &self.settings.start_commands {
            queue.stack(line);
        }
        Interpreter {
            scheduler: ScenarioScheduler::new(&self.settings),
            registry: self.registry,
            synonyms: self.synonyms,
            extensions: self.extensions,
            queue,
            settings: self.settings,
            scenario_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Interpreter
// ---------------------------------------------------------------------------

pub struct Interpreter {
    registry: CommandRegistry,
    synonyms: SynonymTable,
    extensions: ExtensionRouter,
    scheduler: ScenarioScheduler,
    queue: PendingQueue,
    settings: StackSettings,
    scenario_file: Option<String>,
}

impl Interpreter {
    /// An interpreter with the built-in commands.
    pub fn new(settings: StackSettings) -> Result<Self, CommandError> {
        Ok(InterpreterBuilder::new(settings).with_builtins()?.build())
    }

    pub fn builder(settings: StackSettings) -> InterpreterBuilder {
        InterpreterBuilder::new(settings)
    }

    /// Queue one input line (`;`-separated commands allowed).
    pub fn stack(&mut self, cmdline: &str) {
        self.queue.stack(cmdline);
    }

    /// Drain the pending queue, including lines stacked by handlers during
    /// the pass. The queue is empty afterwards.
    pub fn process(&mut self, world: &mut dyn World) -> Vec<LineOutcome> {
        let mut outcomes = Vec::new();
        while let Some(line) = self.queue.pop() {
            let status = self.dispatch_line(world, &line);
            outcomes.push(LineOutcome { line, status });
        }
        self.queue.clear();
        outcomes
    }

    /// Release scenario entries due at `now`, then drain.
    pub fn tick(&mut self, world: &mut dyn World, now: f64) -> Vec<LineOutcome> {
        let released = self.scheduler.tick(now, &mut self.queue);
        if released > 0 {
            debug!(now, released, "scenario commands released");
        }
        self.process(world)
    }

    /// Stack a line and drain immediately.
    pub fn execute(&mut self, world: &mut dyn World, cmdline: &str) -> Vec<LineOutcome> {
        self.stack(cmdline);
        self.process(world)
    }

    pub fn load_scenario(&mut self, name: &str, time_offset: f64, merge: bool) -> Result<LoadReport, ScenarioError> {
        let report = self.scheduler.load(name, time_offset, merge)?;
        if !merge {
            self.scenario_file = Some(name.to_string());
        }
        Ok(report)
    }

    pub fn load_scenario_str(&mut self, content: &str, time_offset: f64, merge: bool) -> LoadReport {
        self.scheduler.load_str(content, time_offset, merge)
    }

    /// Empty the scenario timeline.
    pub fn reset(&mut self) {
        self.scheduler.reset();
    }

    pub fn help(&self, topic: Option<&str>) -> String {
        help_text(&self.registry, &self.synonyms, topic, self.settings.help_line_width)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn extensions(&self) -> &ExtensionRouter {
        &self.extensions
    }

    pub fn scheduler(&self) -> &ScenarioScheduler {
        &self.scheduler
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn settings(&self) -> &StackSettings {
        &self.settings
    }

    /// Scenario most recently opened as initial condition.
    pub fn scenario_file(&self) -> Option<&str> {
        self.scenario_file.as_deref()
    }

    // -----------------------------------------------------------------------
    // One line
    // -----------------------------------------------------------------------

    /// Run a single command segment.
    pub fn dispatch_line(&mut self, world: &mut dyn World, raw: &str) -> Outcome {
        let Interpreter {
            registry,
            synonyms,
            extensions,
            scheduler,
            queue,
            settings,
            scenario_file,
        } = self;

        let line = raw.trim();
        let mut tokens = split_tokens(line);
        if tokens.is_empty() {
            return Outcome::Skipped;
        }

        // `KL204 ALT FL100` is `ALT KL204,FL100`.
        let swapped = tokens.len() > 1
            && world.id_to_index(&tokens[0].to_ascii_uppercase()).is_some();
        if swapped {
            tokens.swap(0, 1);
        }

        let mut name = tokens[0].to_ascii_uppercase();
        let mut args: Vec<String> = tokens[1..].to_vec();
        let implicit = args.is_empty() && world.id_to_index(&name).is_some();
        if implicit {
            args = vec![name];
            name = STATUS_COMMAND.to_string();
        }
        debug!(command = %name, args = args.len(), "dispatching");

        let canonical = synonyms.canonical(&name);

        if let Some(spec) = registry.get(&canonical) {
            let required = spec.signature.mandatory_len();
            if args.len() < required {
                let err = CommandError::TooFewArguments {
                    command: spec.name.clone(),
                    given: args.len(),
                    required,
                };
                syntax_echo(world, &err, line, &spec.usage);
                return Outcome::Failed(err);
            }

            // A lone `txt` parameter takes the rest of the raw line.
            let coerced = if spec.signature.is_single_text() {
                if swapped || implicit {
                    Ok(Args::from_remainder(&args.join(" ")))
                } else {
                    Ok(Args::from_remainder(remainder(line)))
                }
            } else {
                coerce(&spec.name, &spec.signature, &args, |id| world.id_to_index(id))
            };
            let coerced = match coerced {
                Ok(a) => a,
                Err(err) => {
                    if err.is_syntax() {
                        syntax_echo(world, &err, line, &spec.usage);
                    } else {
                        world.echo(&err.to_string());
                    }
                    return Outcome::Failed(err);
                }
            };

            let result = {
                let mut ctx = CommandContext {
                    world: &mut *world,
                    queue: &mut *queue,
                    scheduler: &mut *scheduler,
                    registry: &*registry,
                    synonyms: &*synonyms,
                    settings: &*settings,
                    scenario_file: &mut *scenario_file,
                    command: &spec.name,
                    line,
                };
                spec.call(&mut ctx, &coerced)
            };
            report(world, spec, &args, &result);
            return Outcome::Done(result);
        }

        if let Some(prefix) = extensions.matching_prefix(&canonical).map(str::to_string) {
            let subcommand = canonical.get(prefix.len()..).unwrap_or("");
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(canonical.clone());
            full.extend(args);
            debug!(prefix = %prefix, subcommand, "routing to extension");
            if let Some(extension) = extensions.get_mut(&prefix) {
                let request = ExtensionRequest {
                    subcommand,
                    args: &full,
                };
                let mut ctx = CommandContext {
                    world: &mut *world,
                    queue: &mut *queue,
                    scheduler: &mut *scheduler,
                    registry: &*registry,
                    synonyms: &*synonyms,
                    settings: &*settings,
                    scenario_file: &mut *scenario_file,
                    command: &canonical,
                    line,
                };
                extension.process(&request, &mut ctx);
            }
            return Outcome::Extension { prefix };
        }

        let err = if args.is_empty() {
            CommandError::UnknownCommandOrTarget { name }
        } else {
            CommandError::UnknownCommand { name }
        };
        info!(line, "{}", err);
        world.echo(&err.to_string());
        Outcome::Failed(err)
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("commands", &self.registry.len())
            .field("synonyms", &self.synonyms.len())
            .field("extensions", &self.extensions)
            .field("scheduled", &self.scheduler.timeline().len())
            .field("pending", &self.queue.len())
            .finish()
    }
}

/// Syntax error message, the offending line and the usage text.
fn syntax_echo(world: &mut dyn World, err: &CommandError, line: &str, usage: &str) {
    world.echo(&err.to_string());
    world.echo(line);
    world.echo(usage);
}

/// Surface a handler result to the operator.
fn report(world: &mut dyn World, spec: &CommandSpec, args: &[String], result: &CommandResult) {
    match (&result.message, result.ok) {
        (Some(message), _) => world.echo(&format!("{}: {}", spec.name, message)),
        (None, false) => {
            let asked = args.last().map_or(true, |a| a.trim() == "?");
            if asked {
                world.echo(&spec.usage);
            } else {
                world.echo(&format!("Syntax error: {}", spec.usage));
            }
        }
        (None, true) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::units::FT;
    use crate::world::mock::{Call, MockWorld};
    use crate::world::{Relocation, Selection};

    fn quiet() -> StackSettings {
        StackSettings {
            start_commands: Vec::new(),
            ..StackSettings::default()
        }
    }

    fn interp() -> Interpreter {
        Interpreter::new(quiet()).unwrap()
    }

    fn recorder(name: &str, usage: &str, signature: &str) -> (CommandSpec, Rc<RefCell<Vec<Args>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let spec = CommandSpec::new(name, usage, signature, move |_, args| {
            sink.borrow_mut().push(args.clone());
            CommandResult::ok()
        })
        .unwrap();
        (spec, seen)
    }

    struct Recorder(Rc<RefCell<Vec<(String, Vec<String>)>>>);

    impl Extension for Recorder {
        fn process(&mut self, request: &ExtensionRequest<'_>, ctx: &mut CommandContext<'_>) {
            self.0
                .borrow_mut()
                .push((request.subcommand.to_string(), request.args.to_vec()));
            ctx.world.echo("routed");
        }
    }

    #[test]
    fn start_commands_run_on_first_pass() {
        let mut it = Interpreter::new(StackSettings::default()).unwrap();
        let mut w = MockWorld::new();
        assert_eq!(it.pending().len(), 2);
        it.process(&mut w);
        assert_eq!(w.messages.len(), 2);
        assert!(w.messages[0].starts_with("Simstack console"));
        assert!(it.pending().is_empty());
    }

    #[test]
    fn semicolon_segments_fail_independently() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        let out = it.execute(&mut w, "FOOBAR;ECHO after;ALT ZZ9,FL100;ECHO last");
        assert_eq!(out.len(), 4);
        assert_eq!(
            w.messages,
            vec!["Unknown command or aircraft: FOOBAR", "after", "ALT: ZZ9 not found", "last"]
        );
        assert!(!out[0].status.is_ok());
        assert!(out[1].status.is_ok());
        assert!(it.pending().is_empty());
    }

    #[test]
    fn unknown_command_message_depends_on_arguments() {
        let mut it = interp();
        let mut w = MockWorld::new();
        let out = it.execute(&mut w, "FOOBAR");
        assert!(matches!(
            out[0].status,
            Outcome::Failed(CommandError::UnknownCommandOrTarget { .. })
        ));
        assert_eq!(w.last_message(), Some("Unknown command or aircraft: FOOBAR"));

        let out = it.execute(&mut w, "FOOBAR 1,2");
        assert!(matches!(out[0].status, Outcome::Failed(CommandError::UnknownCommand { .. })));
        assert_eq!(w.last_message(), Some("Unknown command: FOOBAR"));
    }

    #[test]
    fn too_few_arguments_never_reaches_handler() {
        let (spec, seen) = recorder("TEST", "TEST acid,value,[value]", "acid,float,[float]");
        let mut it = Interpreter::builder(quiet()).command(spec).unwrap().build();
        let mut w = MockWorld::with_vehicles(&["KL204"]);

        let out = it.execute(&mut w, "TEST KL204");
        assert!(matches!(
            out[0].status,
            Outcome::Failed(CommandError::TooFewArguments { given: 1, required: 2, .. })
        ));
        assert_eq!(
            w.messages,
            vec!["Syntax error: Too few arguments", "TEST KL204", "TEST acid,value,[value]"]
        );
        assert!(seen.borrow().is_empty());
        assert!(w.calls.is_empty());
    }

    #[test]
    fn missing_optional_argument_is_null() {
        let (spec, seen) = recorder("TEST", "TEST acid,value,[value]", "acid,float,[float]");
        let mut it = Interpreter::builder(quiet()).command(spec).unwrap().build();
        let mut w = MockWorld::with_vehicles(&["KL204"]);

        it.execute(&mut w, "TEST KL204,1.5");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0].index(0), Some(0));
        assert_eq!(seen[0].float(1), Some(1.5));
        assert!(seen[0].is_null(2));
        assert!(w.messages.is_empty());
    }

    #[test]
    fn bare_vehicle_id_shows_status() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        it.execute(&mut w, "kl204");
        assert!(w.messages[0].starts_with("Info on KL204"));
        assert_eq!(w.calls, vec![Call::ShowRoute("KL204".into())]);
    }

    #[test]
    fn vehicle_id_first_swaps_with_command() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        it.execute(&mut w, "KL204 ALT FL100");
        assert_eq!(
            w.calls,
            vec![Call::Select(0, Selection::Altitude { alt: 10000.0 * FT, vspd: None })]
        );
    }

    #[test]
    fn names_and_ids_are_case_insensitive() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        it.execute(&mut w, "alt kl204 fl100");
        assert_eq!(w.calls.len(), 1);
        assert!(w.messages.is_empty());
    }

    #[test]
    fn wildcards_leave_values_unchanged() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        it.execute(&mut w, "MOVE KL204,*,,FL100");
        assert_eq!(
            w.calls,
            vec![Call::Relocate(
                0,
                Relocation {
                    lat: 52.0,
                    lon: 4.0,
                    alt: Some(10000.0 * FT),
                    hdg: None,
                    spd: None,
                    vspd: None,
                }
            )]
        );
    }

    #[test]
    fn coercion_failure_echoes_usage() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        let out = it.execute(&mut w, "HDG KL204,abc");
        assert!(matches!(out[0].status, Outcome::Failed(CommandError::InvalidArgument { .. })));
        assert_eq!(
            w.messages,
            vec!["Syntax error in processing arguments", "HDG KL204,abc", "HDG acid,hdg (deg,True)"]
        );
        assert!(w.calls.is_empty());
    }

    #[test]
    fn bad_latitude_aborts_the_line() {
        let mut it = interp();
        let mut w = MockWorld::with_vehicles(&["KL204"]);
        it.execute(&mut w, "MOVE KL204,N9x,4.0");
        assert_eq!(w.messages[0], "Syntax error in processing arguments");
        assert!(w.calls.is_empty());
    }

    #[test]
    fn result_protocol() {
        let mut it = Interpreter::builder(quiet())
            .command(CommandSpec::new("FAILS", "FAILS [x]", "[txt]", |_, _| CommandResult::fail()).unwrap())
            .unwrap()
            .command(CommandSpec::new("BOOM", "BOOM", "", |_, _| CommandResult::error("boom")).unwrap())
            .unwrap()
            .command(CommandSpec::new("NOTE", "NOTE", "", |_, _| CommandResult::info("noted")).unwrap())
            .unwrap()
            .command(CommandSpec::new("QUIET", "QUIET", "", |_, _| CommandResult::ok()).unwrap())
            .unwrap()
            .build();
        let mut w = MockWorld::new();

        it.execute(&mut w, "FAILS");
        it.execute(&mut w, "FAILS x");
        it.execute(&mut w, "FAILS ?");
        it.execute(&mut w, "BOOM");
        it.execute(&mut w, "NOTE");
        it.execute(&mut w, "QUIET");
        assert_eq!(
            w.messages,
            vec!["FAILS [x]", "Syntax error: FAILS [x]", "FAILS [x]", "BOOM: boom", "NOTE: noted"]
        );
    }

    #[test]
    fn lines_stacked_by_handlers_run_in_the_same_pass() {
        let page = CommandSpec::new("PAGE", "PAGE", "", |ctx, _| {
            ctx.queue.stack("ECHO page 2;ECHO page 3");
            CommandResult::ok()
        })
        .unwrap();
        let mut it = Interpreter::builder(quiet())
            .with_builtins()
            .unwrap()
            .command(page)
            .unwrap()
            .build();
        let mut w = MockWorld::new();
        let out = it.execute(&mut w, "PAGE;ECHO after");
        assert_eq!(out.len(), 4);
        assert_eq!(w.messages, vec!["after", "page 2", "page 3"]);
        assert!(it.pending().is_empty());
    }

    #[test]
    fn extension_prefix_routes_with_full_token_list() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut it = Interpreter::builder(quiet())
            .with_builtins()
            .unwrap()
            .extension("ASA_", Box::new(Recorder(Rc::clone(&seen))))
            .unwrap()
            .synonym("DTLOOK", "ASA_DTLOOK")
            .unwrap()
            .build();
        let mut w = MockWorld::new();

        let out = it.execute(&mut w, "asa_dtlook 300");
        assert!(matches!(&out[0].status, Outcome::Extension { prefix } if prefix == "ASA_"));
        it.execute(&mut w, "DTLOOK 200");

        let seen = seen.borrow();
        assert_eq!(seen[0], ("DTLOOK".to_string(), vec!["ASA_DTLOOK".to_string(), "300".to_string()]));
        assert_eq!(seen[1].1[1], "200");
        assert!(w.echoed("routed"));
    }

    #[test]
    fn scenario_commands_release_on_tick() {
        let mut it = interp();
        let mut w = MockWorld::new();
        it.load_scenario_str(
            "00:00:00.00>CRE KL001,A320,52.0,4.5,090,10000,250\n\
             00:00:05.00>ALT KL001,20000\n",
            0.0,
            false,
        );

        let out = it.tick(&mut w, 0.0);
        assert_eq!(out.len(), 1);
        assert_eq!(w.calls, vec![Call::Create("KL001".into())]);
        assert_eq!(w.roster.len(), 1);

        assert!(it.tick(&mut w, 4.0).is_empty());

        let out = it.tick(&mut w, 5.0);
        assert_eq!(out[0].line, "ALT KL001,20000");
        assert_eq!(
            w.calls[1],
            Call::Select(0, Selection::Altitude { alt: 20000.0 * FT, vspd: None })
        );
        assert!(it.scheduler().timeline().is_empty());
    }

    #[test]
    fn blank_segments_skipped() {
        let mut it = interp();
        let mut w = MockWorld::new();
        let out = it.execute(&mut w, "ECHO a;  ;ECHO b");
        assert!(matches!(out[1].status, Outcome::Skipped));
        assert_eq!(w.messages, vec!["a", "b"]);
    }

    #[test]
    fn echo_keeps_original_casing_and_separators() {
        let mut it = interp();
        let mut w = MockWorld::new();
        it.execute(&mut w, "echo Hello, World  again");
        assert_eq!(w.last_message(), Some("Hello, World  again"));
    }

    #[test]
    fn leading_comma_before_free_text_command() {
        let mut it = interp();
        let mut w = MockWorld::new();
        it.execute(&mut w, ",ECHO hi");
        assert_eq!(w.messages, vec!["hi"]);
    }
}
