//! Registry entry declarations: one documentation string and one argument
//! table per command. The dispatcher turns this table into the clap
//! grammar; nothing here is registered globally.

use baton_core::{ArgSpec, CommandSpec, Registry, Result};

use crate::cli::handlers;
use crate::commands::AppContext;

const INIT_DOC: &str = "Create a new session from the built-in template. \
Refuses to overwrite an existing session unless --force is given.";

const SHOW_DOC: &str = "Show available sessions or one session's descriptor. \
Without a name, every session is listed with its summary line.";

const EDIT_DOC: &str = "Open a session descriptor in the configured editor. \
The editor is taken from VISUAL or EDITOR.";

const LOG_DOC: &str = "Print a session's log. \
With --lines, only the tail of the log is shown.";

const MV_DOC: &str = "Rename a session. The session log moves with it.";

const CP_DOC: &str = "Duplicate a session under a new name. \
The log stays with the original.";

const RM_DOC: &str = "Remove sessions and their logs. \
With --force, names that do not exist are ignored.";

const IMPORT_DOC: &str = "Import descriptor files as sessions. \
Each file is stored under its own stem, which must be a valid session name.";

const EXPORT_DOC: &str = "Pack a session into a portable archive. \
The archive holds the descriptor and, when present, the session log.";

const FETCH_DOC: &str = "Obtain a session from a file, archive, or URL. \
Archives produced by export are restored descriptor and log alike.";

const START_DOC: &str = "Launch a session with the configured runtime. \
The launch and its outcome are recorded in the session log.";

/// The full command table. Constructed once at startup and handed to the
/// dispatcher; fails when a name or argument collides.
pub fn registry() -> Result<Registry<AppContext>> {
    Registry::new(vec![
        CommandSpec::new(
            "init",
            INIT_DOC,
            vec![
                ArgSpec::positional("name", "Name for the new session (must start with a letter)")
                    .required(),
                ArgSpec::flag("force", "Overwrite an existing session").short('f'),
            ],
            handlers::handle_init,
        ),
        CommandSpec::new(
            "show",
            SHOW_DOC,
            vec![
                ArgSpec::positional("name", "Session to show (lists all when omitted)"),
                ArgSpec::flag("json", "Output as JSON"),
            ],
            handlers::handle_show,
        ),
        CommandSpec::new(
            "edit",
            EDIT_DOC,
            vec![ArgSpec::positional("name", "Session to edit").required()],
            handlers::handle_edit,
        ),
        CommandSpec::new(
            "log",
            LOG_DOC,
            vec![
                ArgSpec::positional("name", "Session whose log to print").required(),
                ArgSpec::option("lines", "Print only the last N lines")
                    .short('n')
                    .value_name("N")
                    .unsigned(),
            ],
            handlers::handle_log,
        ),
        CommandSpec::new(
            "mv",
            MV_DOC,
            vec![
                ArgSpec::positional("source", "Current session name").required(),
                ArgSpec::positional("target", "New session name").required(),
            ],
            handlers::handle_mv,
        ),
        CommandSpec::new(
            "cp",
            CP_DOC,
            vec![
                ArgSpec::positional("source", "Session to copy").required(),
                ArgSpec::positional("target", "Name for the copy").required(),
            ],
            handlers::handle_cp,
        ),
        CommandSpec::new(
            "rm",
            RM_DOC,
            vec![
                ArgSpec::variadic("names", "Sessions to remove").required(),
                ArgSpec::flag("force", "Ignore sessions that do not exist").short('f'),
            ],
            handlers::handle_rm,
        ),
        CommandSpec::new(
            "import",
            IMPORT_DOC,
            vec![
                ArgSpec::variadic("paths", "Descriptor files to import").required(),
                ArgSpec::flag("force", "Overwrite existing sessions").short('f'),
            ],
            handlers::handle_import,
        ),
        CommandSpec::new(
            "export",
            EXPORT_DOC,
            vec![
                ArgSpec::positional("name", "Session to export").required(),
                ArgSpec::option("output", "Archive path (default: <name>.tar.gz)")
                    .short('o')
                    .value_name("FILE"),
            ],
            handlers::handle_export,
        ),
        CommandSpec::new(
            "fetch",
            FETCH_DOC,
            vec![
                ArgSpec::positional("source", "Descriptor file, archive, or http(s) URL")
                    .required(),
                ArgSpec::flag("force", "Overwrite existing sessions").short('f'),
            ],
            handlers::handle_fetch,
        ),
        CommandSpec::new(
            "start",
            START_DOC,
            vec![
                ArgSpec::positional("name", "Session to launch").required(),
                ArgSpec::option("runner", "Override the configured runtime command")
                    .value_name("COMMAND"),
            ],
            handlers::handle_start,
        ),
    ])
}
