// Demo runner: base64 encoding and decoding driven by the argument parser

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use argparse::{ArgType, Parser};
use libutils::log::{LevelFilter, Logger, LoggerBuilder};
use libutils::{base64, log_debug, log_err, log_info};

#[derive(Debug)]
enum Request {
    Encode(String),
    Decode(String),
}

type Slot = Rc<RefCell<Option<Request>>>;

fn main() {
    let app = Arc::new(Logger::new("argdemo"));
    if let Some(level) = LevelFilter::from_env(argparse::LOG_ENV) {
        app.set_level(level);
    }

    let request: Slot = Rc::new(RefCell::new(None));
    let mut parser = match build_parser(&app, &request) {
        Ok(parser) => parser,
        Err(e) => {
            log_err!(app, "{}", e);
            std::process::exit(1);
        }
    };

    // failures are logged by the parser together with the usage text
    if parser.parse_env().is_err() {
        std::process::exit(1);
    }

    let Some(request) = request.borrow_mut().take() else {
        log_err!(app, "no command given");
        parser.print_help();
        std::process::exit(1);
    };

    let logger = match run_logger(&app, &parser) {
        Ok(logger) => logger,
        Err(e) => {
            log_err!(app, "{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = execute(&logger, request) {
        log_err!(logger, "{}", e);
        std::process::exit(1);
    }
}

fn build_parser(app: &Arc<Logger>, request: &Slot) -> argparse::Result<Parser> {
    let mut parser = Parser::new("Base64 encoder and decoder");
    parser.set_logger(Arc::new(Logger::child(app, "argparse")));

    parser.add_option("verbose", Some('v'), ArgType::Flag, "Log progress", false)?;
    parser.add_option(
        "log-file",
        Some('l'),
        ArgType::String,
        "Write the log to a file",
        false,
    )?;

    let slot = Rc::clone(request);
    let encode = parser.add_subcommand_with("encode", "Encode text as base64", move |scope| {
        *slot.borrow_mut() = Some(Request::Encode(scope.get_positional(0)?));
        Ok(())
    })?;
    encode.add_positional("text", ArgType::String, "Text to encode")?;

    let slot = Rc::clone(request);
    let decode = parser.add_subcommand_with("decode", "Decode a base64 token", move |scope| {
        *slot.borrow_mut() = Some(Request::Decode(scope.get_positional(0)?));
        Ok(())
    })?;
    decode.add_positional("token", ArgType::String, "Token to decode")?;

    Ok(parser)
}

/// Logger for the command itself, configured by the root options.
fn run_logger(app: &Arc<Logger>, parser: &Parser) -> argparse::Result<Arc<Logger>> {
    let verbose = parser.get::<bool>("verbose")?;
    let builder = LoggerBuilder::new("run").parent(Arc::clone(app));

    let logger = match parser.get::<String>("log-file") {
        Ok(path) => {
            let level = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::ERR
            };
            builder.file(path).level(level).build()
        }
        Err(_) => {
            if verbose {
                app.set_level(LevelFilter::INFO);
            }
            builder.build()
        }
    };
    logger
        .map(Arc::new)
        .map_err(|e| argparse::Error::InvalidConfiguration(e.to_string()))
}

fn execute(logger: &Logger, request: Request) -> libutils::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match request {
        Request::Encode(text) => {
            log_debug!(logger, "encoding {:?}", text);
            base64::encode_to(&mut out, text.as_bytes())?;
            writeln!(out)?;
            log_info!(logger, "encoded {} bytes", text.len());
        }
        Request::Decode(token) => {
            log_debug!(logger, "decoding {:?}", token);
            let bytes = base64::decode(&token)?;
            out.write_all(&bytes)?;
            writeln!(out)?;
            log_info!(logger, "decoded {} bytes", bytes.len());
        }
    }
    out.flush()?;
    Ok(())
}
