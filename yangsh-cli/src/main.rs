//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod session;
mod terminal;

use std::sync::{Arc, Mutex};

use clap::{App, Arg};
use reedline::Signal;
use tracing_subscriber::EnvFilter;
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::path::Prefixes;
use yangsh_core::schema::LeafType;
use yangsh_core::static_schema::StaticSchema;
use yangsh_core::value::Value;

use crate::session::Session;
use crate::terminal::CliPrompt;

// Built-in example schema, used until a datastore back-end is wired in.
fn example_schema() -> (StaticSchema, StaticDataQuery) {
    let mut schema = StaticSchema::new();
    schema.add_module("example");
    schema.add_module("hardware");

    schema.add_container("/", "example:system");
    schema.add_leaf("/example:system", "hostname", LeafType::String);
    schema.add_leaf("/example:system", "contact", LeafType::String);
    schema.add_leaf(
        "/example:system",
        "timezone",
        LeafType::Enumeration(
            ["utc", "cet", "cest"].iter().map(|s| (*s).to_owned()).collect(),
        ),
    );
    schema.add_presence_container("/example:system", "ntp");
    schema.add_leaf("/example:system/ntp", "enabled", LeafType::Bool);

    schema.add_list("/", "example:interfaces", &["name"]);
    schema.add_leaf("/example:interfaces", "name", LeafType::String);
    schema.add_leaf("/example:interfaces", "mtu", LeafType::Uint16);
    schema.add_leaf("/example:interfaces", "enabled", LeafType::Bool);
    schema.set_description(
        "/example:interfaces",
        "The network interfaces of the device.",
    );

    schema.add_leaf_list("/", "example:dns-servers", LeafType::String);

    schema.add_rpc("/", "example:reboot");
    schema.add_rpc("/", "example:ping");
    schema.add_leaf("/example:ping", "host", LeafType::String);

    schema.add_container("/", "hardware:sensors");
    schema.add_leaf(
        "/hardware:sensors",
        "temperature",
        LeafType::Decimal64 { fraction_digits: 2 },
    );
    schema.set_config_false("/hardware:sensors");

    let mut data_query = StaticDataQuery::new();
    data_query.insert(
        "/example:interfaces",
        vec![
            [("name".to_owned(), Value::String("eth0".to_owned()))].into(),
            [("name".to_owned(), Value::String("eth1".to_owned()))].into(),
        ],
    );

    (schema, data_query)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line parameters.
    let matches = App::new("yangsh")
        .version(clap::crate_version!())
        .about("Interactive editor for YANG-modeled configuration trees")
        .arg(
            Arg::with_name("command")
                .short("c")
                .long("command")
                .value_name("COMMAND")
                .help("Execute argument as command")
                .multiple(true),
        )
        .arg(
            Arg::with_name("no-colors")
                .long("no-colors")
                .help("Disable ansi coloring"),
        )
        .arg(
            Arg::with_name("writable-ops")
                .long("writable-ops")
                .help("Allow set/create/delete on operational state"),
        )
        .arg(
            Arg::with_name("prefixes")
                .long("prefixes")
                .value_name("POLICY")
                .possible_values(&["always", "when-needed"])
                .help("Module prefix rendering policy"),
        )
        .get_matches();

    let writable_ops = if matches.is_present("writable-ops") {
        WritableOps::Yes
    } else {
        WritableOps::No
    };
    let prefixes = match matches.value_of("prefixes") {
        Some("always") => Prefixes::Always,
        _ => Prefixes::WhenNeeded,
    };

    // The session and the completer both need the schema for as long as
    // the process lives.
    let (schema, data_query) = example_schema();
    let schema: &'static StaticSchema = Box::leak(Box::new(schema));
    let data_query: &'static StaticDataQuery =
        Box::leak(Box::new(data_query));

    let parser =
        Parser::new(schema, data_query, writable_ops).with_prefixes(prefixes);
    let mut session = Session::new(parser);

    // Process commands passed as arguments, if any.
    if let Some(commands) = matches.values_of("command") {
        for command in commands {
            if session.enter_command(command) {
                break;
            }
        }
        return;
    }

    // Initialize reedline.
    let mut prompt = CliPrompt::new(session.prompt());
    let session = Arc::new(Mutex::new(session));
    let use_ansi_coloring = !matches.is_present("no-colors");
    let mut le = terminal::reedline_init(session.clone(), use_ansi_coloring);

    // Main loop.
    loop {
        match le.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let mut session = session.lock().unwrap();
                if session.enter_command(&line) {
                    break;
                }
                prompt.update(session.prompt());
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(error) => {
                eprintln!("Failed to read line: {}", error);
                std::process::exit(1);
            }
        }
    }
}
