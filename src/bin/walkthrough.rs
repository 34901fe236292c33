//! 浏览器加载页面的分步演示
//!
//! 在虚拟时钟上驱动一个演示组件，按帧打印画面；可选输出 JSON 回放事件。

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use walkthrough_sim::config::WalkthroughConfig;
use walkthrough_sim::dns::{DohResolver, FixtureResolver, LiveLookup};
use walkthrough_sim::i18n::Catalog;
use walkthrough_sim::sim::{Event, SimTime, Simulator, World, world_mut};
use walkthrough_sim::view::render_frame;
use walkthrough_sim::widget::Widget;
use walkthrough_sim::widget::address::to_url;
use walkthrough_sim::widget::exchange::HttpExchange;
use walkthrough_sim::widget::handshake::TcpHandshake;
use walkthrough_sim::widget::parsing::HtmlParsing;
use walkthrough_sim::widget::pipeline::RenderPipeline;
use walkthrough_sim::widget::resolve::DnsConsole;
use walkthrough_sim::widget::transfer::TcpTransfer;

#[derive(Debug, Parser)]
#[command(name = "walkthrough", about = "浏览器如何加载页面：分步动画演示（虚拟时钟）")]
struct Cli {
    /// JSON 配置文件（时序、文案覆盖、DoH 端点）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Args)]
struct Playback {
    /// 仿真运行到多少毫秒
    #[arg(long, default_value_t = 8_000)]
    until_ms: u64,

    /// 采样画面的间隔（毫秒）
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// 输出可视化 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// TCP 三次握手：按 N 次按钮
    Handshake {
        #[arg(long, default_value_t = 3)]
        presses: u32,
        /// 两次按键的间隔（毫秒）
        #[arg(long, default_value_t = 2_000)]
        gap_ms: u64,
        #[command(flatten)]
        play: Playback,
    },
    /// TCP 数据往返，可选在某时刻干扰网络
    Transfer {
        #[arg(long)]
        disrupt_at_ms: Option<u64>,
        #[command(flatten)]
        play: Playback,
    },
    /// HTTP 请求与响应
    Exchange {
        #[command(flatten)]
        play: Playback,
    },
    /// HTML 解析成 DOM 树
    Parsing {
        #[command(flatten)]
        play: Playback,
    },
    /// 布局 / 绘制 / 合成：依次执行动作（color 或 width）
    Pipeline {
        #[arg(long, value_delimiter = ',', default_value = "color,width")]
        actions: Vec<String>,
        #[arg(long, default_value_t = 2_000)]
        gap_ms: u64,
        #[command(flatten)]
        play: Playback,
    },
    /// DNS 查询：依次提交主机名
    Resolve {
        hosts: Vec<String>,
        /// 两次提交的间隔（毫秒）
        #[arg(long, default_value_t = 1_000)]
        gap_ms: u64,
        /// 通过 DNS-over-HTTPS 真实查询
        #[arg(long, default_value_t = false)]
        live: bool,
        #[command(flatten)]
        play: Playback,
    },
    /// 地址栏输入 → URL
    Url { input: Vec<String> },
}

/// 在某个时刻对组件执行一次用户操作
struct Act<W> {
    f: fn(&mut W, &mut Simulator),
}

impl<W: Widget> Event for Act<W> {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        (self.f)(world_mut::<W>(world), sim);
    }
}

struct Submit {
    host: String,
}

impl Event for Submit {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<DnsConsole>(world);
        // 非法输入只影响显示
        let _ = w.submit(sim, &self.host);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => WalkthroughConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WalkthroughConfig::default(),
    };
    let catalog = Catalog::with_overrides(&cfg.messages);
    let timing = cfg.timing;
    let mut sim = Simulator::default();

    match cli.cmd {
        Cmd::Handshake {
            presses,
            gap_ms,
            play,
        } => {
            let mut w = TcpHandshake::new(&catalog, timing.handshake)?;
            for i in 0..u64::from(presses) {
                sim.schedule(
                    SimTime::from_millis(i.saturating_mul(gap_ms)),
                    Act::<TcpHandshake> { f: TcpHandshake::press },
                );
            }
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Transfer {
            disrupt_at_ms,
            play,
        } => {
            let mut w = TcpTransfer::new(&catalog, timing.transfer)?;
            sim.schedule(SimTime::ZERO, Act::<TcpTransfer> { f: TcpTransfer::start });
            if let Some(at) = disrupt_at_ms {
                sim.schedule(
                    SimTime::from_millis(at),
                    Act::<TcpTransfer> {
                        f: TcpTransfer::disrupt,
                    },
                );
            }
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Exchange { play } => {
            let mut w = HttpExchange::new(&catalog, timing.exchange);
            w.start(&mut sim, Utc::now());
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Parsing { play } => {
            let mut w = HtmlParsing::new(&catalog, timing.parsing);
            sim.schedule(SimTime::ZERO, Act::<HtmlParsing> { f: HtmlParsing::parse });
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Pipeline {
            actions,
            gap_ms,
            play,
        } => {
            let mut w = RenderPipeline::new(&catalog, timing.pipeline)?;
            for (i, action) in actions.iter().enumerate() {
                let f: fn(&mut RenderPipeline, &mut Simulator) = match action.as_str() {
                    "color" => RenderPipeline::change_color,
                    "width" => RenderPipeline::change_width,
                    other => anyhow::bail!("unknown pipeline action `{other}` (expected color or width)"),
                };
                let at = (i as u64).saturating_mul(gap_ms);
                sim.schedule(SimTime::from_millis(at), Act { f });
            }
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Resolve {
            hosts,
            gap_ms,
            live,
            play,
        } => {
            let hosts = if hosts.is_empty() {
                vec!["example.com".to_string()]
            } else {
                hosts
            };
            if live {
                return resolve_live(&cfg, &catalog, &hosts);
            }
            let mut w = DnsConsole::new(&catalog, timing.resolve, FixtureResolver::default());
            for (i, host) in hosts.into_iter().enumerate() {
                let at = (i as u64).saturating_mul(gap_ms);
                sim.schedule(SimTime::from_millis(at), Submit { host });
            }
            playback(&mut sim, &mut w, &play)
        }
        Cmd::Url { input } => {
            let input = input.join(" ");
            match to_url(&input) {
                Some(t) => println!("{}", t.describe(&catalog)),
                None => println!("(empty input)"),
            }
            Ok(())
        }
    }
}

/// 按帧推进仿真，画面变化时打印
fn playback<W: Widget>(sim: &mut Simulator, widget: &mut W, play: &Playback) -> Result<()> {
    if play.viz_json.is_some() {
        widget.recorder_mut().enable();
    }
    let until = SimTime::from_millis(play.until_ms);
    let step = SimTime::from_millis(play.frame_ms.max(1));
    let mut last = None;
    loop {
        let next = sim.now().saturating_add(step).min(until);
        sim.run_until(next, widget);
        let frame = widget.frame();
        if last.as_ref() != Some(&frame) {
            println!("t={}\n{}\n", sim.now(), render_frame(&frame));
            last = Some(frame);
        }
        if sim.now() >= until {
            break;
        }
    }
    widget.unmount(sim);
    info!(pending = sim.pending(), "playback finished");

    if let Some(path) = &play.viz_json {
        if let Some(v) = widget.recorder_mut().take() {
            let json = serde_json::to_string_pretty(&v.events).context("serialize viz events")?;
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            eprintln!("wrote viz events to {}", path.display());
        }
    }
    Ok(())
}

fn resolve_live(cfg: &WalkthroughConfig, catalog: &Catalog, hosts: &[String]) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(async {
        let resolver = DohResolver::new(&cfg.doh)?;
        let mut live = LiveLookup::new(resolver, catalog);
        for host in hosts {
            if let Err(e) = live.submit(host).await {
                eprintln!("{host}: {e}");
                continue;
            }
            live.wait().await;
            let d = live.snapshot().await;
            match d.error {
                Some(err) => println!("{}: {err}", d.host),
                None => {
                    for ip in &d.addresses {
                        println!("Name: {} → Address: {ip}", d.host);
                    }
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}
