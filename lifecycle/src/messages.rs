//! Direct messages sent to identities on probation.

use badge_types::{Handle, ModuleKey, PolicyParams};

pub fn warning_message(
    module: &ModuleKey,
    handle: &Handle,
    params: &PolicyParams,
    site_url: &str,
) -> String {
    let failures = params.warning_failure_count;
    let remaining = params.removal_failure_count.saturating_sub(failures);
    format!(
        "⚠️ Hi! Your verification for the {module} module has failed {failures} times for the account @{handle} in our weekly validation. \
         If failures continue {remaining} times more, you will be removed from the verified lists and lose the label. \
         Please check your profile/verification source to ensure it still meets the requirements. \
         If you renamed your account since getting verified, please try again with the new account name on {site_url}."
    )
}

pub fn removal_message(
    module: &ModuleKey,
    handle: &Handle,
    params: &PolicyParams,
    site_url: &str,
) -> String {
    let failures = params.removal_failure_count;
    format!(
        "❌ Hi! Your verification for the {module} module has failed {failures} times for the account @{handle} \
         and you have been removed from the verified lists and lost the label. \
         You can re-apply for verification at any time if you meet the requirements again. \
         If you renamed your account since getting verified, please try again with the new account name on {site_url}."
    )
}
