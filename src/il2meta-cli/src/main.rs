mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use il2meta::{DecodeMode, InspectorConfig, OnSlotError, StringOptions};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Typedefs {
            input,
            typedefs,
            strings,
            count,
            skip_errors,
            json,
            max_string_len,
            lossy,
        } => {
            let mut config = InspectorConfig::new(typedefs, strings, count);
            config.on_slot_error = if skip_errors {
                OnSlotError::Skip
            } else {
                OnSlotError::Abort
            };
            config.strings = StringOptions {
                max_len: max_string_len,
                mode: if lossy {
                    DecodeMode::Replace
                } else {
                    DecodeMode::Lenient
                },
            };

            commands::typedefs(&input, config, json)?;
        }

        Commands::String {
            input,
            strings,
            index,
        } => {
            commands::resolve(&input, strings, index)?;
        }
    }

    Ok(())
}
