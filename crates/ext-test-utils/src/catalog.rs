//! A sample catalog shaped like a small content-management install.
//!
//! | Extension | Notes |
//! |-----------|-------|
//! | `system`, `user` | enabled |
//! | `dblog` | required by the profile, not yet enabled |
//! | `text` | plain dependency target |
//! | `node`, `comment`, `taxonomy` | depend on `text` |
//! | `forum` | depends on `comment` and `taxonomy` |
//! | `views`, `views_ui` | `views_ui` depends on `views (>=10.0)` |
//! | `workflows`, `workspaces` | experimental; `workspaces` depends on `workflows` |
//! | `image` | needs the [`MISSING_TOOL`] binary |
//! | `legacy` | requires core `<10.0` |
//! | `broken` | depends on the absent `ghost` |
//! | `test_helper` | in the `Testing` package |
//! | `internal` | hidden |

use ext_catalog::{Catalog, ExtensionDescriptor, HostEnvironment};

/// A binary name no test machine has on `PATH`.
pub const MISSING_TOOL: &str = "extinstall-test-missing-tool";

/// Extensions enabled in the sample site.
pub const SAMPLE_ENABLED: &[&str] = &["system", "user"];

/// `(file stem, descriptor TOML)` pairs.
pub const SAMPLE_DESCRIPTORS: &[(&str, &str)] = &[
    (
        "system",
        r#"
[extension]
name = "system"
display_name = "System"
version = "10.2.0"
package = "Core"
required = true
"#,
    ),
    (
        "user",
        r#"
dependencies = ["system"]

[extension]
name = "user"
display_name = "User"
version = "10.2.0"
package = "Core"
required = true
"#,
    ),
    (
        "dblog",
        r#"
[extension]
name = "dblog"
display_name = "Database Logging"
version = "10.2.0"
package = "Core"
required = true
explanation = "Logs system events for the standard profile."
"#,
    ),
    (
        "text",
        r#"
[extension]
name = "text"
display_name = "Text"
version = "10.2.0"
package = "Core"
"#,
    ),
    (
        "node",
        r#"
dependencies = ["drupal:text"]

[extension]
name = "node"
display_name = "Node"
version = "10.2.0"
package = "Core"
"#,
    ),
    (
        "comment",
        r#"
dependencies = ["text"]

[extension]
name = "comment"
display_name = "Comment"
version = "10.2.0"
description = "Allows users to comment on content."
package = "Core"
"#,
    ),
    (
        "taxonomy",
        r#"
dependencies = ["text"]

[extension]
name = "taxonomy"
display_name = "Taxonomy"
version = "10.2.0"
package = "Core"
"#,
    ),
    (
        "forum",
        r#"
dependencies = ["comment", "taxonomy"]

[extension]
name = "forum"
display_name = "Forum"
version = "10.2.0"
description = "Provides discussion forums."
package = "Core"
"#,
    ),
    (
        "views",
        r#"
[extension]
name = "views"
display_name = "Views"
version = "10.2.0"
package = "Core"
"#,
    ),
    (
        "views_ui",
        r#"
dependencies = ["drupal:views (>=10.0)"]

[extension]
name = "views_ui"
display_name = "Views UI"
version = "10.2.0"
package = "Core"
"#,
    ),
    (
        "workflows",
        r#"
[extension]
name = "workflows"
display_name = "Workflows"
version = "10.2.0"
package = "Core (Experimental)"
"#,
    ),
    (
        "workspaces",
        r#"
dependencies = ["workflows"]

[extension]
name = "workspaces"
display_name = "Workspaces"
version = "10.2.0"
description = "Content staging areas."
package = "Core (Experimental)"
"#,
    ),
    (
        "image",
        r#"
[extension]
name = "image"
display_name = "Image"
version = "10.2.0"
package = "Media"

[requires]
binaries = ["extinstall-test-missing-tool"]
"#,
    ),
    (
        "legacy",
        r#"
[extension]
name = "legacy"
display_name = "Legacy"
version = "8.x-1.4"
package = "Other"

[requires]
core = "<10.0"
"#,
    ),
    (
        "broken",
        r#"
dependencies = ["ghost"]

[extension]
name = "broken"
display_name = "Broken"
package = "Other"
"#,
    ),
    (
        "test_helper",
        r#"
[extension]
name = "test_helper"
display_name = "Test Helper"
package = "Testing"
"#,
    ),
    (
        "internal",
        r#"
dependencies = ["text"]

[extension]
name = "internal"
display_name = "Internal"
package = "Core"
hidden = true
"#,
    ),
];

/// The sample catalog for the default [`HostEnvironment`].
///
/// # Panics
/// Panics if a sample descriptor fails to parse.
pub fn sample_catalog() -> Catalog {
    sample_catalog_for(&HostEnvironment::default())
}

/// The sample catalog for `host`.
///
/// # Panics
/// Panics if a sample descriptor fails to parse.
pub fn sample_catalog_for(host: &HostEnvironment) -> Catalog {
    SAMPLE_DESCRIPTORS
        .iter()
        .map(|(stem, toml)| {
            let descriptor = ExtensionDescriptor::from_toml(toml)
                .unwrap_or_else(|e| panic!("sample_catalog: descriptor '{stem}' is invalid: {e}"));
            let enabled = SAMPLE_ENABLED.contains(&descriptor.name());
            descriptor
                .into_extension(host, enabled)
                .unwrap_or_else(|e| panic!("sample_catalog: descriptor '{stem}' is invalid: {e}"))
        })
        .collect()
}
