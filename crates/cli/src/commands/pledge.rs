//! Donation pledge command.
//!
//! Pledges are validated locally; nothing is sent anywhere.

use greenroot_core::Pledge;

/// Validate a pledge and print its confirmation.
///
/// # Errors
///
/// Returns an error if the name or email is blank, the email is malformed,
/// or fewer than one tree is pledged.
#[allow(clippy::print_stdout)]
pub fn submit(name: &str, email: &str, trees: Option<u32>) -> greenroot_storefront::Result<()> {
    let pledge = Pledge::new(name, email, trees)?;
    tracing::info!(trees = pledge.trees(), "Pledge accepted");
    println!("{}", pledge.confirmation());
    Ok(())
}

#[cfg(test)]
mod tests {
    use greenroot_core::PledgeError;
    use greenroot_storefront::Error;

    use super::*;

    #[test]
    fn test_submit_valid_pledge() {
        assert!(submit("Rahim", "rahim@example.com", Some(3)).is_ok());
    }

    #[test]
    fn test_submit_rejects_zero_trees() {
        let err = submit("Rahim", "rahim@example.com", Some(0)).unwrap_err();
        assert!(matches!(err, Error::Pledge(PledgeError::TooFewTrees)));
    }
}
