//! Walks the poll service through a full session: register, login, vote,
//! read results, list, create, fetch and delete. Prints each status code and
//! body. Token-dependent steps are skipped when login does not succeed.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use poll_core::{
    ApiResult, AuthToken, ClientConfig, HttpResponse, Poll, PollServiceClient, TokenResponse,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "poll-demo", about = "Exercise every poll service endpoint in order")]
struct Args {
    /// Base URL of the poll service.
    #[arg(long, env = "POLL_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[arg(long, env = "POLL_USERNAME", default_value = "testuser")]
    username: String,

    #[arg(long, env = "POLL_PASSWORD", default_value = "testpassword")]
    password: String,

    /// Poll to vote on before a new one is created.
    #[arg(long, default_value_t = 1)]
    poll_id: i64,

    /// Option to vote for.
    #[arg(long, default_value_t = 1)]
    option_id: i64,

    /// Per-request timeout in seconds. No timeout when unset.
    #[arg(long, env = "POLL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    let mut config = ClientConfig::new(&args.base_url);
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = PollServiceClient::new(&config);
    tracing::info!(base_url = client.base_url(), "starting demo");

    run(&client, &args);
    Ok(())
}

fn run(client: &PollServiceClient, args: &Args) {
    let mut poll_id = Some(args.poll_id);

    println!("Attempting to register user: {}", args.username);
    if let Some(resp) = report("Register", client.register_user(&args.username, &args.password)) {
        match resp.status {
            200 => println!("User registered successfully!"),
            400 => println!("Registration failed: username may already be taken."),
            _ => unexpected("registering", &resp),
        }
    }
    separator();

    println!("Attempting to log in as: {}", args.username);
    let mut token = None;
    if let Some(resp) = report("Login", client.login(&args.username, &args.password)) {
        match resp.status {
            200 => match resp.json::<TokenResponse>() {
                Ok(body) => {
                    println!("Login successful!");
                    token = Some(AuthToken::from(body));
                }
                Err(err) => println!("Login response had no access token: {err}"),
            },
            400 => println!("Login failed: incorrect username or password."),
            _ => unexpected("logging in", &resp),
        }
    }
    separator();

    match (&token, poll_id) {
        (Some(token), Some(id)) => {
            println!("Attempting to vote for option {} on poll {id}", args.option_id);
            if let Some(resp) = report("Cast Vote", client.cast_vote(id, args.option_id, token)) {
                match resp.status {
                    200 => println!("Vote cast successfully!"),
                    _ => unexpected("voting", &resp),
                }
            }
        }
        _ => println!("Skipping vote because login failed or no access token was received."),
    }
    separator();

    if let Some(id) = poll_id {
        println!("Attempting to get results for poll {id}");
        if let Some(resp) = report("Poll Results", client.get_poll_results(id)) {
            match resp.status {
                200 => println!("Poll results retrieved successfully!"),
                404 => println!("Poll not found."),
                _ => unexpected("fetching results", &resp),
            }
        }
        separator();
    }

    println!("Attempting to list polls");
    if let Some(resp) = report("List Polls", client.list_polls()) {
        if resp.status != 200 {
            unexpected("listing polls", &resp);
        }
    }
    separator();

    if let Some(token) = &token {
        let question = "What is your favorite programming language?";
        let options = ["Python", "JavaScript", "Java", "C++", "Go"];
        println!("Attempting to create a poll: '{question}' with options {options:?}");
        if let Some(resp) = report("Create Poll", client.create_poll(question, options, token)) {
            match (resp.status, resp.json::<Poll>()) {
                (200, Ok(created)) => {
                    println!("Poll created successfully!");
                    poll_id = Some(created.id);
                }
                _ => unexpected("creating a poll", &resp),
            }
        }
    } else {
        println!("Skipping poll creation because login failed or no access token was received.");
    }
    separator();

    match poll_id {
        Some(id) => {
            println!("Attempting to retrieve poll {id}");
            if let Some(resp) = report("Get Specific Poll", client.get_poll(id)) {
                match resp.status {
                    200 => println!("Specific poll retrieved successfully!"),
                    404 => println!("Specific poll not found."),
                    _ => unexpected("retrieving the poll", &resp),
                }
            }
        }
        None => println!("Skipping get specific poll because no poll ID is available."),
    }
    separator();

    match (&token, poll_id) {
        (Some(token), Some(id)) => {
            println!("Attempting to delete poll {id}");
            if let Some(resp) = report("Delete Poll", client.delete_poll(id, token)) {
                match resp.status {
                    204 => println!("Poll deleted successfully!"),
                    404 => println!("Poll not found or not authorized to delete."),
                    _ => unexpected("deleting the poll", &resp),
                }
            }
        }
        _ => println!("Skipping delete because login failed or no poll ID is available."),
    }
    separator();
}

/// Print status and body. `None` means the call did not complete, either
/// because the service could not be reached or the transport failed.
fn report(label: &str, result: ApiResult) -> Option<HttpResponse> {
    let resp = match result {
        Ok(Some(resp)) => resp,
        Ok(None) => {
            println!("{label}: could not connect to the poll service.");
            return None;
        }
        Err(err) => {
            println!("{label}: request failed: {err}");
            return None;
        }
    };
    println!("{label} Status Code: {}", resp.status);
    match serde_json::from_slice::<serde_json::Value>(&resp.body) {
        Ok(json) => println!("Response JSON: {json}"),
        Err(_) if resp.body.is_empty() => {}
        Err(_) => println!("Response Text: {}", resp.text()),
    }
    Some(resp)
}

fn unexpected(action: &str, resp: &HttpResponse) {
    println!(
        "An unexpected error occurred while {action}. Status: {}, Response: {}",
        resp.status,
        resp.text()
    );
}

fn separator() {
    println!("\n{}\n", "=".repeat(20));
}
