use devframe_codec::{Frame, OpCode};
use devframe_registry::{generic_error, generic_result, ParsedResponse, ResponseClass};

use crate::cmd::{connect_client, SendArgs};
use crate::exit::{
    client_error, registry_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS,
};
use crate::output::{print_response, OutputFormat};

/// Transmit a hand-built frame and render whatever comes back.
///
/// With no originating command to pair the response against, both
/// branches fall back to the generic body rendering.
pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let request = Frame::from_hex(&args.frame)
        .map_err(|err| crate::exit::frame_error("--frame", err))?;

    let mut client = connect_client(&args.addr, &args.connect_timeout, &args.io_timeout)?;
    let response = client
        .transact(&request)
        .map_err(|err| client_error("transaction failed", err))?;
    client.disconnect();

    let parsed = classify(&response)?;
    print_response("raw", "send", &parsed, &response, format);
    Ok(match parsed.class {
        ResponseClass::Result => SUCCESS,
        ResponseClass::Error => FAILURE,
    })
}

fn classify(response: &Frame) -> CliResult<ParsedResponse> {
    let (class, rendered) = match response.operation() {
        OpCode::Res => (
            ResponseClass::Result,
            generic_result(response).map_err(|err| registry_error("parse failed", err))?,
        ),
        OpCode::Err => (
            ResponseClass::Error,
            generic_error(response).map_err(|err| registry_error("parse failed", err))?,
        ),
        operation => {
            return Err(CliError::new(
                DATA_INVALID,
                format!("device answered with request operation {operation}"),
            ))
        }
    };
    Ok(ParsedResponse { class, rendered })
}
