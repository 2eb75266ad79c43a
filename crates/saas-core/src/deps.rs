//! Install-time dependencies implied by the selected modules

use indexmap::IndexSet;

/// Always installed: the infrastructure and auth client libraries
pub const BASE_DEPENDENCIES: &[&str] = &["@supabase/supabase-js", "@supabase/ssr"];

/// Extra packages per known module id
fn module_dependencies(module: &str) -> &'static [&'static str] {
    match module {
        "stripe" => &["stripe", "@stripe/stripe-js"],
        "resend" => &["resend", "@react-email/components"],
        "openai" => &["openai"],
        _ => &[],
    }
}

/// Base set first, then each module's packages in selection order, first occurrence wins
pub fn resolve_dependencies<S: AsRef<str>>(modules: &[S]) -> IndexSet<String> {
    BASE_DEPENDENCIES
        .iter()
        .copied()
        .chain(
            modules
                .iter()
                .flat_map(|m| module_dependencies(m.as_ref()).iter().copied()),
        )
        .map(str::to_string)
        .collect()
}
