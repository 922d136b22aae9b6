//! Plugins shipped with the binary, embedded at compile time.
//!
//! The sources live in the top-level `plugins/` directory so they double as examples
//! for users writing their own.

/// `(name, yaml)` for every built-in plugin.
pub fn builtin_plugins() -> Vec<(&'static str, &'static str)> {
    vec![
        ("express", include_str!("../../plugins/express.yml")),
        ("fastapi", include_str!("../../plugins/fastapi.yml")),
        ("flask", include_str!("../../plugins/flask.yml")),
        ("django", include_str!("../../plugins/django.yml")),
        ("laravel", include_str!("../../plugins/laravel.yml")),
        ("spring", include_str!("../../plugins/spring.yml")),
        ("gin", include_str!("../../plugins/gin.yml")),
    ]
}
