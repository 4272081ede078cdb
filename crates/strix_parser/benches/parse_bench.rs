use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strix_ast::{ScriptExtension, ScriptKind};
use strix_parser::ParserImpl;

// A medium-size TypeScript module exercising most of the grammar.
const TYPESCRIPT_SOURCE: &str = r#"
import { EventEmitter } from 'events';
import type { Logger } from './logger';

export interface User {
    id: number;
    name: string;
    email: string;
    age?: number;
    readonly createdAt: number;
}

export type UserId = User['id'];
export type Lookup = Map<UserId, User>;

const enum Status {
    Active,
    Suspended = 10,
    Deleted,
}

export class UserService extends EventEmitter {
    #users: Lookup = new Map();
    private nextId: UserId = 1;

    constructor(private readonly logger: Logger) {
        super();
    }

    createUser(name: string, email: string): User {
        const user: User = {
            id: this.nextId++,
            name,
            email,
            createdAt: Date.now(),
        };
        this.#users.set(user.id, user);
        this.logger.info(`created user ${user.id}`);
        return user;
    }

    findUser(id: UserId): User | undefined {
        return this.#users.get(id);
    }

    *activeUsers(): Generator<User> {
        for (const [, user] of this.#users) {
            if (this.statusOf(user) === Status.Active) {
                yield user;
            }
        }
    }

    private statusOf(user: User): Status {
        return user.age !== undefined && user.age < 0 ? Status.Deleted : Status.Active;
    }

    async reload(): Promise<void> {
        const data = await fetch('/users');
        const parsed = (await data.json()) as User[];
        this.#users = new Map(parsed.map(u => [u.id, u]));
    }
}

export function formatUser({ id, name, email = 'unknown' }: User): string {
    return `${id}: ${name} <${email}>`;
}

export default new UserService(console as unknown as Logger);
"#;

const JAVASCRIPT_SOURCE: &str = r#"
'use strict';

function fib(n) {
    return n < 2 ? n : fib(n - 1) + fib(n - 2);
}

const memo = new Map();
function fibFast(n) {
    if (memo.has(n)) return memo.get(n);
    const value = n < 2 ? n : fibFast(n - 1) + fibFast(n - 2);
    memo.set(n, value);
    return value;
}

outer: for (let i = 0; i < 100; i++) {
    for (let j = 0; j < i; j++) {
        if (i * j > 1000) continue outer;
        if (i + j === 150) break outer;
    }
}

const handlers = {
    async onLoad(event) {
        const { target, ...rest } = event;
        try {
            await process(target);
        } catch (err) {
            console.error(`load failed: ${err?.message ?? 'unknown'}`, rest);
        } finally {
            cleanup();
        }
    },
    get count() {
        return this._count ?? 0;
    },
    set count(value) {
        this._count = value;
    },
};
"#;

fn bench_parse_typescript(c: &mut Criterion) {
    let parser = ParserImpl::new(ScriptExtension::Ts);
    c.bench_function("parse_typescript_module", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = parser
                .parse(
                    &arena,
                    "bench.ts",
                    black_box(TYPESCRIPT_SOURCE),
                    "bench.ts",
                    ScriptKind::Module,
                )
                .expect("bench source must parse");
            black_box(program.ast.statements.len())
        })
    });
}

fn bench_parse_javascript(c: &mut Criterion) {
    let parser = ParserImpl::new(ScriptExtension::Js);
    c.bench_function("parse_javascript_script", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = parser
                .parse(
                    &arena,
                    "bench.js",
                    black_box(JAVASCRIPT_SOURCE),
                    "bench.js",
                    ScriptKind::Script,
                )
                .expect("bench source must parse");
            black_box(program.ast.statements.len())
        })
    });
}

criterion_group!(benches, bench_parse_typescript, bench_parse_javascript);
criterion_main!(benches);
