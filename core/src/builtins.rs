//! Built-in command table.
//!
//! Each handler unpacks its coerced arguments and forwards them to the
//! world collaborators. Handlers that talk to the operator echo through
//! [`Feedback`](crate::world::Feedback) themselves; everything else goes
//! back through the [`CommandResult`] protocol.

use std::f64::consts::SQRT_2;

use tracing::{info, warn};

use crate::args::{text, Args};
use crate::command::{CommandContext, CommandResult, CommandSpec};
use crate::error::CommandError;
use crate::help::help_text;
use crate::registry::{CommandRegistry, SynonymTable};
use crate::scenario::export::{export_lines, save_scenario};
use crate::scenario::scenario_file_path;
use crate::world::{PanTarget, Relocation, RouteEnd, Selection, VehicleSpec};

type HandlerFn = fn(&mut CommandContext<'_>, &Args) -> CommandResult;

struct Builtin {
    name: &'static str,
    usage: &'static str,
    signature: &'static str,
    handler: HandlerFn,
}

const BUILTINS: &[Builtin] = &[
    Builtin { name: "ALT", usage: "ALT acid, alt, [vspd]", signature: "acid,alt,[vspd]", handler: cmd_alt },
    Builtin { name: "CRE", usage: "CRE acid,type,lat,lon,hdg,alt,spd", signature: "txt,txt,lat,lon,hdg,alt,spd", handler: cmd_cre },
    Builtin { name: "DEL", usage: "DEL acid", signature: "txt", handler: cmd_del },
    Builtin { name: "DEST", usage: "DEST acid, [airport]", signature: "acid,[txt]", handler: cmd_dest },
    Builtin { name: "DT", usage: "DT dt", signature: "float", handler: cmd_dt },
    Builtin { name: "DTMULT", usage: "DTMULT multiplier", signature: "float", handler: cmd_dtmult },
    Builtin { name: "ECHO", usage: "ECHO txt", signature: "txt", handler: cmd_echo },
    Builtin { name: "FF", usage: "FF [tend]", signature: "[time]", handler: cmd_ff },
    Builtin { name: "FIXDT", usage: "FIXDT ON/OFF [tend]", signature: "onoff,[time]", handler: cmd_fixdt },
    Builtin { name: "HDG", usage: "HDG acid,hdg (deg,True)", signature: "acid,hdg", handler: cmd_hdg },
    Builtin { name: "HELP", usage: "HELP [command]", signature: "[txt]", handler: cmd_help },
    Builtin { name: "HOLD", usage: "HOLD", signature: "", handler: cmd_hold },
    Builtin { name: "IC", usage: "IC [filename/IC]", signature: "[txt]", handler: cmd_ic },
    Builtin { name: "MOVE", usage: "MOVE acid,lat,lon,[alt,hdg,spd,vspd]", signature: "acid,lat,lon,[alt,hdg,spd,vspd]", handler: cmd_move },
    Builtin { name: "NOM", usage: "NOM acid", signature: "acid", handler: cmd_nom },
    Builtin { name: "OP", usage: "OP", signature: "", handler: cmd_op },
    Builtin { name: "ORIG", usage: "ORIG acid, [airport]", signature: "acid,[txt]", handler: cmd_orig },
    Builtin { name: "PAN", usage: "PAN LEFT/RIGHT/UP/DOWN/acid/airport/navid or PAN lat,lon", signature: "txt,[txt]", handler: cmd_pan },
    Builtin { name: "PCALL", usage: "PCALL filename [REL/ABS]", signature: "txt,[txt]", handler: cmd_pcall },
    Builtin { name: "POS", usage: "POS acid", signature: "acid", handler: cmd_pos },
    Builtin { name: "RESET", usage: "RESET", signature: "", handler: cmd_reset },
    Builtin { name: "SAVEIC", usage: "SAVEIC filename", signature: "txt", handler: cmd_saveic },
    Builtin { name: "SEED", usage: "SEED value", signature: "int", handler: cmd_seed },
    Builtin { name: "SPD", usage: "SPD acid,spd (CAS-kts/Mach)", signature: "acid,spd", handler: cmd_spd },
    Builtin { name: "STOP", usage: "STOP", signature: "", handler: cmd_stop },
    Builtin { name: "VS", usage: "VS acid,vspd (ft/min)", signature: "acid,vspd", handler: cmd_vs },
    Builtin { name: "ZOOM", usage: "ZOOM IN/OUT/factor", signature: "txt", handler: cmd_zoom },
];

const SYNONYMS: &[(&str, &str)] = &[
    ("CONTINUE", "OP"),
    ("CREATE", "CRE"),
    ("END", "STOP"),
    ("EXIT", "STOP"),
    ("FWD", "FF"),
    ("PAUSE", "HOLD"),
    ("Q", "STOP"),
    ("QUIT", "STOP"),
    ("RUN", "OP"),
    ("START", "OP"),
    ("TURN", "HDG"),
    ("?", "HELP"),
];

/// Register the built-in commands and their synonyms.
pub fn register_builtins(
    registry: &mut CommandRegistry,
    synonyms: &mut SynonymTable,
) -> Result<(), CommandError> {
    for b in BUILTINS {
        registry.register(CommandSpec::new(b.name, b.usage, b.signature, b.handler)?)?;
    }
    for (alias, target) in SYNONYMS {
        synonyms.insert(alias, target)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Traffic
// ---------------------------------------------------------------------------

fn cmd_alt(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match (args.index(0), args.float(1)) {
        (Some(idx), Some(alt)) => ctx.world.select(
            idx,
            Selection::Altitude {
                alt,
                vspd: args.float(2),
            },
        ),
        _ => CommandResult::fail(),
    }
}

fn cmd_cre(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let fields = (
        args.text(0),
        args.text(1),
        args.float(2),
        args.float(3),
        args.float(4),
        args.float(5),
        args.speed(6),
    );
    let (Some(id), Some(type_code), Some(lat), Some(lon), Some(hdg), Some(alt), Some(spd)) = fields
    else {
        return CommandResult::fail();
    };
    ctx.world.create(VehicleSpec {
        id: id.to_ascii_uppercase(),
        type_code: type_code.to_ascii_uppercase(),
        lat,
        lon,
        hdg,
        alt,
        spd,
    })
}

fn cmd_del(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(id) = args.text(0) else {
        return CommandResult::fail();
    };
    let id = id.trim().to_ascii_uppercase();
    if ctx.world.delete(&id) {
        CommandResult::ok()
    } else {
        CommandResult::error(format!("{} not found.", id))
    }
}

fn cmd_dest(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    route_end(ctx, args, RouteEnd::Destination)
}

fn cmd_orig(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    route_end(ctx, args, RouteEnd::Origin)
}

/// DEST/ORIG: set the airport, or report the current one.
fn route_end(ctx: &mut CommandContext<'_>, args: &Args, end: RouteEnd) -> CommandResult {
    let Some(idx) = args.index(0) else {
        return CommandResult::fail();
    };
    let id = ctx.world.vehicle_id(idx).unwrap_or_default();
    match args.text(1) {
        None => {
            let current = ctx.world.route_end(idx, end).unwrap_or_default();
            ctx.world.echo(&format!("{} {}: {}", end.command(), id, current));
            CommandResult::ok()
        }
        Some(name) => {
            let name = name.trim().to_ascii_uppercase();
            let result = ctx.world.set_route_end(idx, end, &name);
            if !result.ok {
                return result;
            }
            if ctx.world.airport(&name).is_none() && ctx.world.waypoint(&name).is_none() {
                return CommandResult::error(format!("{} not found.", name));
            }
            result
        }
    }
}

fn cmd_hdg(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match (args.index(0), args.float(1)) {
        (Some(idx), Some(hdg)) => ctx.world.select(idx, Selection::Heading(hdg)),
        _ => CommandResult::fail(),
    }
}

fn cmd_move(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(idx) = args.index(0) else {
        return CommandResult::fail();
    };
    let Some((cur_lat, cur_lon)) = ctx.world.position(idx) else {
        return CommandResult::fail();
    };
    ctx.world.relocate(
        idx,
        Relocation {
            lat: args.float(1).unwrap_or(cur_lat),
            lon: args.float(2).unwrap_or(cur_lon),
            alt: args.float(3),
            hdg: args.float(4),
            spd: args.speed(5),
            vspd: args.float(6),
        },
    )
}

fn cmd_nom(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match args.index(0) {
        Some(idx) => ctx.world.nominal(idx),
        None => CommandResult::fail(),
    }
}

fn cmd_pos(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(idx) = args.index(0) else {
        return CommandResult::fail();
    };
    for line in ctx.world.status_lines(idx) {
        ctx.world.echo(&line);
    }
    if let Some(id) = ctx.world.vehicle_id(idx) {
        ctx.world.show_route(&id);
    }
    CommandResult::ok()
}

fn cmd_spd(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match (args.index(0), args.speed(1)) {
        (Some(idx), Some(spd)) => ctx.world.select(idx, Selection::Speed(spd)),
        _ => CommandResult::fail(),
    }
}

fn cmd_vs(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match (args.index(0), args.float(1)) {
        (Some(idx), Some(vs)) => ctx.world.select(idx, Selection::VerticalSpeed(vs)),
        _ => CommandResult::fail(),
    }
}

// ---------------------------------------------------------------------------
// Simulation control
// ---------------------------------------------------------------------------

fn cmd_op(ctx: &mut CommandContext<'_>, _args: &Args) -> CommandResult {
    ctx.world.start();
    CommandResult::ok()
}

fn cmd_hold(ctx: &mut CommandContext<'_>, _args: &Args) -> CommandResult {
    ctx.world.hold();
    CommandResult::ok()
}

fn cmd_stop(ctx: &mut CommandContext<'_>, _args: &Args) -> CommandResult {
    ctx.world.stop();
    CommandResult::ok()
}

fn cmd_reset(ctx: &mut CommandContext<'_>, _args: &Args) -> CommandResult {
    ctx.world.reset();
    ctx.scheduler.reset();
    CommandResult::ok()
}

fn cmd_dt(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match args.float(0) {
        Some(dt) => ctx.world.set_dt(dt),
        None => CommandResult::fail(),
    }
}

fn cmd_dtmult(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match args.float(0) {
        Some(m) => ctx.world.set_dt_multiplier(m),
        None => CommandResult::fail(),
    }
}

fn cmd_ff(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    ctx.world.fast_forward(args.float(0));
    CommandResult::ok()
}

fn cmd_fixdt(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match args.flag(0) {
        Some(on) => {
            ctx.world.set_fixed_dt(on, args.float(1));
            CommandResult::ok()
        }
        None => CommandResult::fail(),
    }
}

fn cmd_seed(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    match args.int(0) {
        Some(seed) => {
            ctx.world.set_seed(seed);
            CommandResult::ok()
        }
        None => CommandResult::fail(),
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

fn cmd_echo(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    ctx.world.echo(args.text(0).unwrap_or(""));
    CommandResult::ok()
}

fn cmd_help(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let text = help_text(
        ctx.registry,
        ctx.synonyms,
        args.text(0),
        ctx.settings.help_line_width,
    );
    ctx.world.echo(&text);
    CommandResult::ok()
}

fn cmd_pan(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(first) = args.text(0) else {
        return CommandResult::fail();
    };
    if let Some(second) = args.text(1) {
        return match (text::parse_lat(first), text::parse_lon(second)) {
            (Ok(lat), Ok(lon)) => {
                ctx.world.pan(PanTarget::Absolute { lat, lon });
                CommandResult::ok()
            }
            _ => CommandResult::fail(),
        };
    }

    let name = first.trim().to_ascii_uppercase();
    let relative = match name.as_str() {
        "LEFT" => Some((0.0, -0.5)),
        "RIGHT" => Some((0.0, 0.5)),
        "UP" => Some((0.5, 0.0)),
        "DOWN" => Some((-0.5, 0.0)),
        _ => None,
    };
    if let Some((dlat, dlon)) = relative {
        ctx.world.pan(PanTarget::Relative { dlat, dlon });
        return CommandResult::ok();
    }

    let found = ctx
        .world
        .id_to_index(&name)
        .and_then(|idx| ctx.world.position(idx))
        .or_else(|| ctx.world.waypoint(&name))
        .or_else(|| ctx.world.airport(&name));
    match found {
        Some((lat, lon)) if lat.is_finite() && lon.is_finite() => {
            ctx.world.pan(PanTarget::Absolute { lat, lon });
            CommandResult::ok()
        }
        Some(_) => CommandResult::ok(),
        None => CommandResult::error(format!("{} not found.", name)),
    }
}

fn cmd_zoom(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(arg) = args.text(0) else {
        return CommandResult::fail();
    };
    match arg.trim().to_ascii_uppercase().as_str() {
        "IN" => ctx.world.zoom(SQRT_2, false),
        "OUT" => ctx.world.zoom(1.0 / SQRT_2, false),
        other => match other.parse::<f64>() {
            Ok(factor) if factor > 0.0 => ctx.world.zoom(factor, true),
            _ => return CommandResult::fail(),
        },
    }
    CommandResult::ok()
}

// ---------------------------------------------------------------------------
// Scenario files
// ---------------------------------------------------------------------------

fn cmd_ic(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    ctx.world.reset();
    ctx.scheduler.reset();

    let requested = match args.text(0) {
        Some(name) if name.trim().eq_ignore_ascii_case("IC") => ctx.scenario_file.clone(),
        Some(name) => Some(name.trim().to_string()),
        None => ctx.world.choose_scenario(),
    };
    let Some(name) = requested.filter(|n| !n.trim().is_empty()) else {
        return CommandResult::ok();
    };

    ctx.world.echo(&format!("Opening {} ...", name));
    *ctx.scenario_file = Some(name.clone());
    match ctx.scheduler.load(&name, 0.0, false) {
        Ok(report) => {
            info!(scenario = %name, loaded = report.loaded, "initial condition loaded");
            CommandResult::ok()
        }
        Err(e) => CommandResult::error(e.to_string()),
    }
}

fn cmd_pcall(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(name) = args.text(0) else {
        return CommandResult::fail();
    };
    let offset = match args.text(1).map(str::to_ascii_uppercase).as_deref() {
        None | Some("ABS") => 0.0,
        Some("REL") => ctx.world.sim_time(),
        Some(_) => return CommandResult::fail(),
    };
    match ctx.scheduler.load(name, offset, true) {
        Ok(_) => CommandResult::ok(),
        Err(e) => CommandResult::error(e.to_string()),
    }
}

fn cmd_saveic(ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
    let Some(name) = args.text(0) else {
        return CommandResult::fail();
    };
    let path = scenario_file_path(ctx.scheduler.directory(), ctx.scheduler.extension(), name);
    let lines = export_lines(&ctx.world.snapshot());
    match save_scenario(&path, &lines) {
        Ok(()) => {
            info!(path = %path.display(), lines = lines.len(), "initial condition saved");
            CommandResult::ok()
        }
        Err(e) => {
            warn!(error = %e, "SAVEIC failed");
            CommandResult::error("Error writing file")
        }
    }
}
