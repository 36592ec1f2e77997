// SPDX-License-Identifier: MPL-2.0
use iced_apod::app::{self, paths, Flags};

fn main() -> iced::Result {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        api_key: args.opt_value_from_str("--api-key").ok().flatten(),
        data_dir: args.opt_value_from_str("--data-dir").ok().flatten(),
        config_dir: args.opt_value_from_str("--config-dir").ok().flatten(),
    };

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());
    app::run(flags)
}
