//! 逐跳路由 ping 仿真
//!
//! 构建拓扑（全连接 / 链状 / 环状，或从 JSON 描述读取），节点之间通过 channel
//! 发送 ping/pong，等待全部送达后输出统计。

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ahc_rs::demo::{DemoStats, PingNode};
use ahc_rs::net::{Channel, Edge, Graph, NodeId, TopologyError};
use ahc_rs::sim::{SimConfig, Simulation};
use ahc_rs::topo::{SimSpec, TopologySpec, build_from_graph, build_from_spec, build_full_mesh};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shape {
    Mesh,
    Line,
    Ring,
}

#[derive(Debug, Parser)]
#[command(name = "mesh_sim", about = "逐跳路由 ping 仿真：src -> dst 的 ping/pong")]
struct Args {
    /// 节点数（使用 --spec 时忽略）
    #[arg(long, default_value_t = 4)]
    nodes: usize,
    #[arg(long, value_enum, default_value_t = Shape::Mesh)]
    shape: Shape,
    /// JSON 拓扑描述文件
    #[arg(long)]
    spec: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    src: usize,
    /// 缺省为编号最大的节点
    #[arg(long)]
    dst: Option<usize>,
    #[arg(long, default_value_t = 1)]
    pings: u32,
    /// 每个组件的 worker 线程数
    #[arg(long)]
    workers: Option<usize>,
    /// 等待送达的超时时间（毫秒）
    #[arg(long, default_value_t = 2_000)]
    timeout_ms: u64,
    /// 输出拓扑快照 JSON
    #[arg(long)]
    viz_out: Option<PathBuf>,
}

/// 链状或环状图（全连接由 `build_full_mesh` 构建）
fn shape_graph(ring: bool, nodes: usize) -> Result<Graph, TopologyError> {
    let mut g = Graph::undirected();
    for i in 0..nodes {
        g.add_node(NodeId(i));
    }
    for i in 1..nodes {
        g.add_edge(NodeId(i - 1), NodeId(i))?;
    }
    if ring && nodes > 2 {
        g.add_edge(NodeId(nodes - 1), NodeId(0))?;
    }
    Ok(g)
}

fn run(args: Args) -> ahc_rs::Result<bool> {
    let spec = match &args.spec {
        Some(path) => Some(SimSpec::load(path)?),
        None => None,
    };

    let mut config = spec.as_ref().map(|s| s.config.clone()).unwrap_or_default();
    if let Some(w) = args.workers {
        config = SimConfig { default_workers: w };
    }

    let node_count = match spec.as_ref().map(|s| &s.topology) {
        Some(TopologySpec::Graph { nodes, .. }) => nodes.iter().max().map_or(0, |m| m + 1),
        Some(TopologySpec::FullMesh { nodes }) | Some(TopologySpec::NodesOnly { nodes }) => *nodes,
        Some(TopologySpec::SingleNode { .. }) => 1,
        Some(TopologySpec::SenderReceiver) => 2,
        None => args.nodes,
    };
    let src = NodeId(args.src);
    let dst = NodeId(args.dst.unwrap_or(node_count.saturating_sub(1)));

    let stats = Arc::new(DemoStats::default());
    let (tx, rx) = crossbeam_channel::unbounded();
    let make_node = |id: NodeId| {
        let node = PingNode::new(id, Arc::clone(&stats), tx.clone());
        if id == src {
            node.with_target(dst, args.pings)
        } else {
            node
        }
    };
    let make_channel = |_: Edge| Channel::new();

    let mut sim = Simulation::new(config);
    match &spec {
        Some(s) => build_from_spec(&mut sim, &s.topology, make_node, make_channel)?,
        None => match args.shape {
            Shape::Mesh => build_full_mesh(&mut sim, args.nodes, make_node, make_channel)?,
            Shape::Line => build_from_graph(&mut sim, shape_graph(false, args.nodes)?, make_node, make_channel)?,
            Shape::Ring => build_from_graph(&mut sim, shape_graph(true, args.nodes)?, make_node, make_channel)?,
        },
    };

    let running = sim.start()?;

    if let Some(path) = &args.viz_out {
        let file = File::create(path)?;
        running
            .topology()
            .snapshot()
            .write_json(file)
            .map_err(ahc_rs::topo::SpecError::from)?;
    }

    // 每个 ping 产生两次送达（ping + pong）
    let expected = u64::from(args.pings) * 2;
    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    let mut received = 0u64;
    while received < expected {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(_) => received += 1,
            Err(_) => break,
        }
    }

    running.shutdown();

    println!(
        "done delivered={}, forwarded={}, dropped={}",
        stats.delivered(),
        stats.forwarded(),
        stats.dropped()
    );
    Ok(received == expected)
}

fn main() -> ExitCode {
    // 初始化 tracing
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

    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("timed out waiting for deliveries");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
