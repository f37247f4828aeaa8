#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use term_probe::{ProbeError, Stream, SystemProbe, TerminalSize, TtyCommand, UserIdentity};

/// Scripted probe that records which strategies were asked for.
pub struct FakeProbe {
    pub ttys: [bool; 3],
    pub sizes: [Option<(u16, u16)>; 3],
    pub stdin_link: Result<PathBuf, io::ErrorKind>,
    pub tty_device: Result<String, io::ErrorKind>,
    pub tty_command: TtyCommand,
    pub user: Option<UserIdentity>,
    pub working_dir: Option<PathBuf>,
    pub fd_names: BTreeMap<i32, String>,
    pub umask: Option<u32>,
    pub calls: RefCell<Vec<&'static str>>,
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            ttys: [false; 3],
            sizes: [None; 3],
            stdin_link: Err(io::ErrorKind::NotFound),
            tty_device: Err(io::ErrorKind::NotFound),
            tty_command: TtyCommand::NotFound,
            user: None,
            working_dir: None,
            fd_names: BTreeMap::new(),
            umask: None,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeProbe {
    pub fn interactive() -> Self {
        let mut fd_names = BTreeMap::new();
        for fd in 0..3 {
            fd_names.insert(fd, "/dev/pts/7".to_string());
        }
        Self {
            ttys: [true; 3],
            sizes: [Some((100, 30)), Some((120, 40)), Some((120, 40))],
            stdin_link: Ok(PathBuf::from("/dev/pts/7")),
            tty_device: Ok("/dev/pts/7".to_string()),
            tty_command: TtyCommand::Output("/dev/pts/7".to_string()),
            user: Some(UserIdentity {
                name: "dev".to_string(),
                uid: 1000,
                gid: 1000,
                home: "/home/dev".to_string(),
            }),
            working_dir: Some(PathBuf::from("/work")),
            fd_names,
            umask: Some(0o022),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn index(stream: Stream) -> usize {
        stream.fd() as usize
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|name| **name == call).count()
    }
}

impl SystemProbe for FakeProbe {
    fn pid(&self) -> u32 {
        4242
    }

    fn ppid(&self) -> Option<u32> {
        Some(1)
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        self.working_dir
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn current_user(&self) -> Result<UserIdentity, ProbeError> {
        self.user
            .clone()
            .ok_or(ProbeError::UnknownUser { uid: 4321 })
    }

    fn is_tty(&self, stream: Stream) -> bool {
        self.record("is_tty");
        self.ttys[Self::index(stream)]
    }

    fn size(&self, stream: Stream) -> Option<TerminalSize> {
        self.record(match stream {
            Stream::Stdin => "size_stdin",
            Stream::Stdout => "size_stdout",
            Stream::Stderr => "size_stderr",
        });
        self.sizes[Self::index(stream)].and_then(|(cols, rows)| TerminalSize::new(cols, rows))
    }

    fn read_fd_link(&self, _fd: i32) -> io::Result<PathBuf> {
        self.record("read_fd_link");
        self.stdin_link.clone().map_err(io::Error::from)
    }

    fn fd_name(&self, fd: i32) -> Option<String> {
        self.record("fd_name");
        self.fd_names.get(&fd).cloned()
    }

    fn open_tty_device(&self) -> io::Result<String> {
        self.record("open_tty_device");
        self.tty_device.clone().map_err(io::Error::from)
    }

    fn tty_command(&self) -> TtyCommand {
        self.record("tty_command");
        self.tty_command.clone()
    }

    fn umask(&self) -> Option<u32> {
        self.umask
    }
}

pub fn render<P: SystemProbe>(probe: &P, env: &term_probe::MapEnv) -> String {
    let mut out = Vec::new();
    term_probe::EnvReport::new(probe, env)
        .write_to(&mut out)
        .expect("report writes to a Vec");
    String::from_utf8(out).expect("report is utf-8")
}
