use std::backtrace::Backtrace;
use std::{fmt::Write, panic};

pub fn setup_panic_hook() {
    panic::set_hook(Box::new(panic_hook));
}

fn panic_hook(info: &panic::PanicHookInfo) {
    let mut fmt_error = String::new();
    let _ = writeln!(fmt_error, "{}", info);

    // this could be controlled with an env var at compilation instead
    const SHOW_BACKTRACE: bool = true;

    if SHOW_BACKTRACE {
        let backtrace = Backtrace::force_capture().to_string();

        // Skip frames belonging to the panic machinery itself.
        if backtrace.contains("__rust_end_short_backtrace") {
            for line in backtrace
                .lines()
                .skip_while(|line| !line.contains("__rust_end_short_backtrace"))
                .skip(1)
            {
                let _ = writeln!(fmt_error, "{}", line);
            }
        } else {
            let _ = writeln!(fmt_error, "{}", backtrace);
        }
    }

    log::error!("{}", fmt_error);
}
