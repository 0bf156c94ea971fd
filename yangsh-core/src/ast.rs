//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::fmt;

use enum_as_inner::EnumAsInner;

use crate::path::{DataPath, ListKeys, SchemaPath};
use crate::value::Value;

/// Datastores addressable by `copy`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Datastore {
    Running,
    Startup,
}

/// Datastore targets addressable by `switch` and `get --datastore`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DatastoreTarget {
    Operational,
    Running,
    Startup,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataFormat {
    Json,
    Xml,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LsOption {
    Recursive,
}

/// A path argument that may name either tree.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum AnyPath {
    Data(DataPath),
    Schema(SchemaPath),
}

/// `ls` target: a path into either tree, or a whole module (`module:*`).
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum LsPath {
    Data(DataPath),
    Schema(SchemaPath),
    Module(String),
}

/// `get` target: a data path or a whole module (`module:*`).
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum GetPath {
    Data(DataPath),
    Module(String),
}

/// Where a `move` puts the selected (leaf-)list instance. Relative
/// destinations carry the key instance of the sibling to move around; for
/// leaf-lists the single pseudo-key `.` holds the sibling's value.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum MoveDestination {
    Begin,
    End,
    Before(ListKeys),
    After(ListKeys),
}

/// A fully parsed command. Values are produced fresh by each parse and
/// owned by the caller.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum Command {
    Cancel,
    Cd {
        path: DataPath,
    },
    Commit,
    Copy {
        source: Datastore,
        destination: Datastore,
    },
    Create {
        path: DataPath,
    },
    Delete {
        path: DataPath,
    },
    Describe {
        path: AnyPath,
    },
    Discard,
    Dump {
        format: DataFormat,
    },
    Exec {
        path: Option<DataPath>,
    },
    Get {
        datastore: Option<DatastoreTarget>,
        path: Option<GetPath>,
    },
    Help {
        command: Option<CommandKind>,
    },
    Ls {
        options: Vec<LsOption>,
        path: Option<LsPath>,
    },
    Move {
        source: DataPath,
        destination: MoveDestination,
    },
    Prepare {
        path: DataPath,
    },
    Quit,
    Set {
        path: DataPath,
        value: Value,
    },
    Switch {
        target: DatastoreTarget,
    },
}

/// Command tags, used by `help` and by the top-level keyword table.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum CommandKind {
    Cancel,
    Cd,
    Commit,
    Copy,
    Create,
    Delete,
    Describe,
    Discard,
    Dump,
    Exec,
    Get,
    Help,
    Ls,
    Move,
    Prepare,
    Quit,
    Set,
    Switch,
}

// ===== impl Datastore =====

impl fmt::Display for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datastore::Running => write!(f, "running"),
            Datastore::Startup => write!(f, "startup"),
        }
    }
}

// ===== impl DatastoreTarget =====

impl fmt::Display for DatastoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatastoreTarget::Operational => write!(f, "operational"),
            DatastoreTarget::Running => write!(f, "running"),
            DatastoreTarget::Startup => write!(f, "startup"),
        }
    }
}

// ===== impl Command =====

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Cancel => CommandKind::Cancel,
            Command::Cd { .. } => CommandKind::Cd,
            Command::Commit => CommandKind::Commit,
            Command::Copy { .. } => CommandKind::Copy,
            Command::Create { .. } => CommandKind::Create,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Describe { .. } => CommandKind::Describe,
            Command::Discard => CommandKind::Discard,
            Command::Dump { .. } => CommandKind::Dump,
            Command::Exec { .. } => CommandKind::Exec,
            Command::Get { .. } => CommandKind::Get,
            Command::Help { .. } => CommandKind::Help,
            Command::Ls { .. } => CommandKind::Ls,
            Command::Move { .. } => CommandKind::Move,
            Command::Prepare { .. } => CommandKind::Prepare,
            Command::Quit => CommandKind::Quit,
            Command::Set { .. } => CommandKind::Set,
            Command::Switch { .. } => CommandKind::Switch,
        }
    }
}

// ===== impl CommandKind =====

impl CommandKind {
    pub const ALL: [CommandKind; 18] = [
        CommandKind::Cancel,
        CommandKind::Cd,
        CommandKind::Commit,
        CommandKind::Copy,
        CommandKind::Create,
        CommandKind::Delete,
        CommandKind::Describe,
        CommandKind::Discard,
        CommandKind::Dump,
        CommandKind::Exec,
        CommandKind::Get,
        CommandKind::Help,
        CommandKind::Ls,
        CommandKind::Move,
        CommandKind::Prepare,
        CommandKind::Quit,
        CommandKind::Set,
        CommandKind::Switch,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::Cancel => "cancel",
            CommandKind::Cd => "cd",
            CommandKind::Commit => "commit",
            CommandKind::Copy => "copy",
            CommandKind::Create => "create",
            CommandKind::Delete => "delete",
            CommandKind::Describe => "describe",
            CommandKind::Discard => "discard",
            CommandKind::Dump => "dump",
            CommandKind::Exec => "exec",
            CommandKind::Get => "get",
            CommandKind::Help => "help",
            CommandKind::Ls => "ls",
            CommandKind::Move => "move",
            CommandKind::Prepare => "prepare",
            CommandKind::Quit => "quit",
            CommandKind::Set => "set",
            CommandKind::Switch => "switch",
        }
    }

    pub const fn short_help(self) -> &'static str {
        match self {
            CommandKind::Cancel => "cancel - Cancel an ongoing RPC input.",
            CommandKind::Cd => "cd - Enter a different node.",
            CommandKind::Commit => "commit - Commit current changes.",
            CommandKind::Copy => {
                "copy - Copy configuration datastores around."
            }
            CommandKind::Create => "create - Create a node.",
            CommandKind::Delete => "delete - Delete a node.",
            CommandKind::Describe => {
                "describe - Print information about a node."
            }
            CommandKind::Discard => "discard - Discard current changes.",
            CommandKind::Dump => {
                "dump - Print the entire datastore content."
            }
            CommandKind::Exec => "exec - Execute an RPC or action.",
            CommandKind::Get => {
                "get - Retrieve configuration from the datastore."
            }
            CommandKind::Help => "help - Print help for commands.",
            CommandKind::Ls => "ls - List available nodes.",
            CommandKind::Move => {
                "move - Move (leaf-)list instances around."
            }
            CommandKind::Prepare => "prepare - Initiate an RPC or action.",
            CommandKind::Quit => "quit - Exit.",
            CommandKind::Set => "set - Change the value of a leaf.",
            CommandKind::Switch => "switch - Change the datastore target.",
        }
    }

    pub const fn long_help(self) -> &'static str {
        match self {
            CommandKind::Cancel => {
                "\
cancel

Cancels a previously entered RPC/action context. Accepts no arguments.

Usage:
    /> cancel"
            }
            CommandKind::Cd => {
                "\
cd <path>

Enters a node specified by a data path. The path must point to a
container or a list instance.

Usage:
    /> cd /module:node/node2
    /> cd .."
            }
            CommandKind::Commit => {
                "\
commit

Commits the current changes. Accepts no arguments.

Usage:
    /> commit"
            }
            CommandKind::Copy => {
                "\
copy <source> <destination>

Copies the contents of one configuration datastore into another. The
source and destination must differ.

Usage:
    /> copy running startup
    /> copy startup running"
            }
            CommandKind::Create => {
                "\
create <path>

Creates a presence container, a list instance or a leaf-list instance.

Usage:
    /> create /module:pContainer
    /> create /module:list[key=value][anotherKey=value]
    /> create /module:leafList[.='value']"
            }
            CommandKind::Delete => {
                "\
delete <path>

Deletes a presence container, a list instance, a leaf-list instance or
a leaf value.

Usage:
    /> delete /module:pContainer
    /> delete /module:list[key=value][anotherKey=value]"
            }
            CommandKind::Describe => {
                "\
describe <path>

Shows documentation of a node: its description from the schema, its
type, units, default value and status.

Usage:
    /> describe /module:node"
            }
            CommandKind::Discard => {
                "\
discard

Discards the current changes. Accepts no arguments.

Usage:
    /> discard"
            }
            CommandKind::Dump => {
                "\
dump xml|json

Prints the content of the entire datastore in the requested format.

Usage:
    /> dump xml
    /> dump json"
            }
            CommandKind::Exec => {
                "\
exec [path]

Executes an RPC or action. Without a path, executes the RPC/action
previously initiated by `prepare`. With a path, the RPC/action must not
have any input parameters.

Usage:
    /> exec
    /> exec /module:myRpc"
            }
            CommandKind::Get => {
                "\
get [--datastore running|startup|operational] [path]

Retrieves the subtree of the current node, or of the path given as an
argument. Also accepts a `module:*` wildcard.

Usage:
    /> get
    /> get --datastore operational
    /> get /module:path"
            }
            CommandKind::Help => {
                "\
help [command_name]

Prints help for command_name. If used without an argument, prints short
help for all commands.

Usage:
    /> help
    /> help cd"
            }
            CommandKind::Ls => {
                "\
ls [--recursive] [path]

Lists available nodes in the current directory. Optionally accepts a
path argument; both schema paths and data paths work, as does a
`module:*` wildcard. A path starting with a forward slash is absolute.

Usage:
    /> ls
    /> ls --recursive module:node
    /> ls /module:node"
            }
            CommandKind::Move => {
                "\
move <path> begin
move <path> end
move <path> before <key>
move <path> after <key>

Moves an instance of an ordered-by-user list or leaf-list.

Usage:
    /> move mod:leaflist['abc'] begin
    /> move mod:leaflist['def'] after 'abc'
    /> move mod:interfaces[name='eth0'] after [name='eth1']"
            }
            CommandKind::Prepare => {
                "\
prepare <path-to-rpc-or-action>

Enters a mode for setting the input parameters of an RPC or action.
Use `exec` to execute it or `cancel` to leave the mode.

Usage:
    /> prepare /module:myRpc"
            }
            CommandKind::Quit => {
                "\
quit

Exits. Accepts no arguments.

Usage:
    /> quit"
            }
            CommandKind::Set => {
                "\
set <path_to_leaf> <value>

Changes the leaf specified by the path to the given value. The value is
checked against the leaf's type.

Usage:
    /> set /module:leaf 123
    /> set /module:leaf2 'some string'"
            }
            CommandKind::Switch => {
                "\
switch running|startup|operational

Changes the datastore target of subsequent read and write commands.

Usage:
    /> switch running
    /> switch operational"
            }
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
