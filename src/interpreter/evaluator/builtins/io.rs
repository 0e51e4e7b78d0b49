use std::{fs, thread, time::Duration};

use walkdir::WalkDir;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::builtins::core::{as_int, as_str},
        value::core::Value,
    },
};

/// `print(...)`: writes the space-joined string forms of the arguments,
/// followed by a newline.
pub(crate) fn print(args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    let joined = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
    println!("{joined}");
    Ok(Value::empty())
}

/// `millis()`: the wall clock in milliseconds since the Unix epoch,
/// truncated into the runtime integer type.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn millis(_args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    let elapsed = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)
                                              .unwrap_or(Duration::ZERO);
    Ok(Value::Int(elapsed.as_millis() as i32))
}

/// `sleep(ms)`: blocks the current task. Uninterruptible.
pub(crate) fn sleep(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let ms = as_int(&args[0], "sleep()", line)?;
    if ms > 0 {
        thread::sleep(Duration::from_millis(u64::from(ms.unsigned_abs())));
    }
    Ok(Value::empty())
}

/// `read(path)`: the file's contents as a string.
pub(crate) fn read(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let path = args[0].to_string();
    fs::read_to_string(&path).map(Value::Str).map_err(|_| {
                                                  RuntimeError::IoError { details: format!("Could not open file for reading: {path}"),
                                                                          line }
                                              })
}

/// `write(path, content)`: writes the content's string form, replacing any
/// existing file.
pub(crate) fn write(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let path = args[0].to_string();
    let content = args[1].to_string();
    fs::write(&path, content).map_err(|_| {
                                 RuntimeError::IoError { details: format!("Could not open file \
                                                                           for writing: {path}"),
                                                         line }
                             })?;
    Ok(Value::empty())
}

/// `copy(src, dst)`: copies a file.
pub(crate) fn copy(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let source = args[0].to_string();
    let dest = args[1].to_string();
    fs::copy(&source, &dest).map_err(|_| {
                                RuntimeError::IoError { details: format!("Could not copy \
                                                                          '{source}' to \
                                                                          '{dest}'"),
                                                        line }
                            })?;
    Ok(Value::empty())
}

/// `readDir(path)`: the names of the directory's immediate entries, sorted.
pub(crate) fn read_dir(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let path = as_str(&args[0], "readDir()", line)?;

    let mut names = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|_| {
                             RuntimeError::IoError { details: format!("Could not read directory: \
                                                                       {path}"),
                                                     line }
                         })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let values: Vec<Value> = names.into_iter().map(Value::Str).collect();
    Ok(values.into())
}

/// `assert(cond, message)`: aborts with the message when the condition is
/// falsy.
pub(crate) fn assert_fn(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if args[0].is_truthy() {
        Ok(Value::empty())
    } else {
        Err(RuntimeError::AssertionFailed { message: args[1].to_string(),
                                            line })
    }
}

/// `error(message)`: aborts with the message.
pub(crate) fn error_fn(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    Err(RuntimeError::UserError { message: args[0].to_string(),
                                  line })
}
