//! Command line construction for llama-server.

use std::ffi::OsString;

use lmgate_core::ModelParams;

/// Build the llama-server arguments for a model listening on `port`.
///
/// Thread count and GPU layers are only passed when configured, leaving
/// llama.cpp's own defaults in place otherwise.
pub fn server_args(params: &ModelParams, port: u16) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-m".into(),
        params.model_path.clone().into_os_string(),
        "--host".into(),
        "127.0.0.1".into(),
        "--port".into(),
        port.to_string().into(),
        "-c".into(),
        params.context_size.to_string().into(),
    ];

    if let Some(threads) = params.threads {
        args.push("-t".into());
        args.push(threads.to_string().into());
    }

    if let Some(layers) = params.gpu_layers {
        args.push("-ngl".into());
        args.push(layers.to_string().into());
    }

    args
}
