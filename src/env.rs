use std::{cell::RefCell, ffi::OsStr};

/// Environment knobs, read once at startup.
#[derive(Clone, Copy)]
struct Env {
    trace: bool,
}

thread_local! {
    /// Must only be mutated within `install`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        trace: var_enabled("BRAID_TRACE"),
    };
    install(value);
}

/// Per-step execution tracing in the driver loop.
pub fn trace() -> bool {
    with_env(|env| env.trace)
}

fn install(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow();
        let env = env.unwrap_or_else(|| {
            panic!("tried to access environment state before initialization");
        });
        callback(&env)
    })
}

fn var_enabled(name: impl AsRef<OsStr>) -> bool {
    std::env::var(name.as_ref()).is_ok_and(|v| v == "1" || v == "true")
}
