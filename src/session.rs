// Terminal session helpers

use std::io::IsTerminal;

use dialoguer::Input;
use url::Url;

/// True when stdin and stdout are both attached to a terminal, meaning the
/// user can be prompted for a consent code.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Display the authorization URL and read back the verification code the
/// user obtained from it.
///
/// No strategy calls this on its own: the consent-code exchange (trading
/// the code for a token set and persisting it) is owned by the embedding
/// application, and this helper covers the terminal half of that flow on
/// top of [`crate::request_authorization`].
///
/// ```no_run
/// use google_api_authorizer::session;
/// use url::Url;
///
/// let authorization_url =
///     Url::parse("https://accounts.google.com/o/oauth2/auth?client_id=1234")?;
/// let code = session::prompt_for_authorization_code(&authorization_url)?;
/// // Trade `code` for a token set and persist it next to the client.
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn prompt_for_authorization_code(authorization_url: &Url) -> dialoguer::Result<String> {
    println!("Open the following link in your browser:");
    println!("{}", authorization_url);

    let code: String = Input::new()
        .with_prompt("Enter verification code")
        .interact_text()?;

    Ok(code.trim().to_string())
}
